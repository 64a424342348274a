//! Application assembly.
//!
//! [`AppBuilder`] collects the configuration, an optional [`PluginSource`] and
//! any number of [`LifecycleListener`]s. [`AppBuilder::build`] runs the
//! synchronous phases (descriptor validation and load ordering) and yields a
//! [`PreparedApp`]; [`PreparedApp::start`] activates the plugins and yields the
//! running [`App`].

use thiserror::Error ;

use crate::config::PluginConfig ;
use crate::descriptor::{ DescriptorError, DescriptorTable };
use crate::engine::{ ActivationEngine, ActivationError };
use crate::factory::Service ;
use crate::lifecycle::{ LifecycleListener, LifecycleNotifier };
use crate::plugin_id::PluginId ;
use crate::registry::ServiceRegistry ;
use crate::resolver::{ self, LoadOrder, UnresolvedDependencyError };
use crate::source::PluginSource ;



/// Any error that stops an application from starting.
#[derive( Debug, Error )]
pub enum StartupError {
	#[error( transparent )]
	Descriptor( #[from] DescriptorError ),
	#[error( transparent )]
	UnresolvedDependency( #[from] UnresolvedDependencyError ),
	#[error( transparent )]
	Activation( #[from] ActivationError ),
}

/// Collects everything needed to start an application.
///
/// ```
/// use plugin_compose::{ AppBuilder, PluginConfig, ProvidedServices, factory_fn };
///
/// # #[tokio::main( flavor = "current_thread" )]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let app = AppBuilder::new()
/// 	.with_plugin( PluginConfig::new( "greeter" )
/// 		.without_imports()
/// 		.export( "greeting" )
/// 		.factory( factory_fn(| _, _, exports | {
/// 			exports.provide( ProvidedServices::new().with( "greeting", "hello" ));
/// 			Ok(())
/// 		})))
/// 	.start().await?;
///
/// assert_eq!( *app.get_as::<&str>( "greeter/greeting" ).unwrap(), "hello" );
/// # Ok(())
/// # }
/// ```
#[derive( Default )]
#[must_use = "call .build() or .start() to load the plugins"]
pub struct AppBuilder {
	plugins: Vec<PluginConfig>,
	source: Option<Box<dyn PluginSource>>,
	notifier: LifecycleNotifier,
}

impl AppBuilder {

	pub fn new() -> Self { Self::default() }

	/// Appends one plugin to the configuration.
	pub fn with_plugin( mut self, plugin: impl Into<PluginConfig> ) -> Self {
		self.plugins.push( plugin.into() );
		self
	}

	/// Appends plugins to the configuration, keeping their order.
	pub fn with_plugins<P: Into<PluginConfig>>( mut self, plugins: impl IntoIterator<Item = P> ) -> Self {
		self.plugins.extend( plugins.into_iter().map( Into::into ));
		self
	}

	/// Sets where plugins configured without a factory are looked up.
	pub fn with_source( mut self, source: impl PluginSource + 'static ) -> Self {
		self.source = Some( Box::new( source ));
		self
	}

	/// Registers a listener. Listeners are notified in registration order.
	pub fn with_listener( mut self, listener: impl LifecycleListener + 'static ) -> Self {
		self.notifier.push( Box::new( listener ));
		self
	}

	/// Validates the configuration and computes the load order. No plugin runs yet.
	///
	/// Listeners are notified of a failure here as well.
	///
	/// # Errors
	/// - [`StartupError::Descriptor`] if the configuration is invalid or discovery fails
	/// - [`StartupError::UnresolvedDependency`] if some imports can never be satisfied
	pub fn build( self ) -> Result<PreparedApp, StartupError> {

		let Self { plugins, source, notifier } = self ;

		let prepared = DescriptorTable::build( plugins, source.as_deref().map(| source | source as &dyn PluginSource ))
			.map_err( StartupError::from )
			.and_then(| table | resolver::resolve( table ).map_err( StartupError::from ));

		match prepared {
			Ok( order ) => Ok( PreparedApp { order, notifier }),
			Err( err ) => {
				tracing::error!( error = %err, "Application startup failed" );
				notifier.error( &err );
				Err( err )
			}
		}

	}

	/// Shorthand for [`build`]( Self::build ) followed by [`PreparedApp::start`].
	///
	/// # Errors
	/// See [`build`]( Self::build ) and [`PreparedApp::start`].
	pub async fn start( self ) -> Result<App, StartupError> {
		self.build()?.start().await
	}

}

impl std::fmt::Debug for AppBuilder {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "AppBuilder" )
			.field( "plugins", &self.plugins )
			.field( "has_source", &self.source.is_some() )
			.field( "notifier", &self.notifier )
			.finish()
	}
}

/// A validated, ordered application whose plugins have not been activated yet.
#[must_use = "call .start() to activate the plugins"]
pub struct PreparedApp {
	order: LoadOrder,
	notifier: LifecycleNotifier,
}

impl PreparedApp {

	/// The order plugins will be activated in.
	#[inline] pub fn load_order( &self ) -> &LoadOrder { &self.order }

	/// Activates every plugin, one after the other.
	///
	/// Never times out on its own: a plugin that holds on to its export handle
	/// without answering stalls startup. Wrap the future in a timeout if that
	/// matters.
	///
	/// # Errors
	/// Returns [`StartupError::Activation`] for the first plugin that fails;
	/// later plugins are never activated.
	pub async fn start( self ) -> Result<App, StartupError> {

		let Self { order, notifier } = self ;
		let load_order = order.ids().cloned().collect::<Vec<_>>();
		tracing::info!( plugins = load_order.len(), listeners = notifier.len(), "Activating plugins" );

		match ActivationEngine::new( order, &notifier ).run().await {
			Ok( registry ) => Ok( App { registry, load_order }),
			Err( err ) => {
				let err = StartupError::from( err );
				notifier.error( &err );
				Err( err )
			}
		}

	}

}

impl std::fmt::Debug for PreparedApp {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "PreparedApp" )
			.field( "order", &self.order.ids().collect::<Vec<_>>() )
			.field( "notifier", &self.notifier )
			.finish()
	}
}

/// A started application: every plugin is active and its services are registered.
#[derive( Debug, Clone )]
pub struct App {
	registry: ServiceRegistry,
	load_order: Vec<PluginId>,
}

impl App {

	#[inline] pub fn registry( &self ) -> &ServiceRegistry { &self.registry }

	/// Plugin ids in the order they were activated.
	#[inline] pub fn load_order( &self ) -> &[PluginId] { &self.load_order }

	/// Shorthand for [`ServiceRegistry::get`].
	pub fn get( &self, name: &str ) -> Option<&Service> { self.registry.get( name ) }

	/// Shorthand for [`ServiceRegistry::get_as`].
	pub fn get_as<T: std::any::Any + Send + Sync>( &self, name: &str ) -> Option<std::sync::Arc<T>> {
		self.registry.get_as( name )
	}

	pub fn into_registry( self ) -> ServiceRegistry { self.registry }

}
