//! Sequential plugin activation.
//!
//! The engine walks the load order one plugin at a time. Each plugin gets the
//! services it imports, answers through its [`ExportHandle`], and its exports
//! are committed to the registry before the next plugin is looked at. At most
//! one plugin is ever in flight and the first failure ends the run.

use std::collections::VecDeque ;
use itertools::Itertools ;
use thiserror::Error ;
use tracing::Instrument ;

use crate::descriptor::PluginDescriptor ;
use crate::factory::{ BoxError, ExportHandle, Imports, PluginFactory, ProvidedServices, Service };
use crate::lifecycle::LifecycleNotifier ;
use crate::plugin_id::PluginId ;
use crate::registry::{ DuplicateServiceError, ServiceRegistry };
use crate::resolver::LoadOrder ;
use crate::service_name::{ QualifiedServiceName, ServiceNameError };



/// The plugin's [`ExportHandle`] was dropped without reporting anything.
#[derive( Debug, Clone, Copy, PartialEq, Eq, Error )]
#[error( "the export handle was dropped without providing any services" )]
pub struct ExportHandleDropped ;

/// The plugin's factory panicked while being activated. Carries the panic message.
#[derive( Debug, Clone, PartialEq, Eq, Error )]
#[error( "the factory panicked: {0}" )]
pub struct FactoryPanicked( pub String );

impl FactoryPanicked {
	fn from_payload( payload: &( dyn std::any::Any + Send )) -> Self {
		let message = payload.downcast_ref::<&str>().map(| message | message.to_string() )
			.or_else(|| payload.downcast_ref::<String>().cloned() )
			.unwrap_or_else(|| "unknown panic payload".to_string() );
		Self( message )
	}
}

/// Errors that halt activation. None of them are retried.
#[derive( Debug, Error )]
pub enum ActivationError {
	/// The factory returned an error, reported one through its handle,
	/// panicked (the source is then [`FactoryPanicked`]) or dropped the handle
	/// (the source is then [`ExportHandleDropped`]).
	#[error( "Plugin {plugin} failed to activate: {source}" )]
	PluginActivation { plugin: PluginId, source: BoxError },
	/// A declared export is absent from what the plugin provided.
	#[error( "Plugin {plugin} did not provide its declared export {service}" )]
	MissingExport { plugin: PluginId, service: QualifiedServiceName },
	/// A provided service key can not be qualified.
	#[error( "Plugin {plugin} provided a service under an invalid name: {source}" )]
	InvalidServiceName { plugin: PluginId, source: ServiceNameError },
	/// A provided service is already registered, or provided twice.
	#[error( "Plugin {plugin} could not register its services: {source}" )]
	DuplicateService { plugin: PluginId, source: DuplicateServiceError },
}

impl ActivationError {
	/// The plugin whose activation failed.
	pub fn plugin( &self ) -> &PluginId {
		match self {
			Self::PluginActivation { plugin, .. }
			| Self::MissingExport { plugin, .. }
			| Self::InvalidServiceName { plugin, .. }
			| Self::DuplicateService { plugin, .. } => plugin,
		}
	}
}

/// Where the engine is in its run.
#[derive( Debug, Clone, PartialEq, Eq )]
pub(crate) enum ActivationState {
	Idle,
	Activating( PluginId ),
	Failed,
	AllReady,
}

pub(crate) struct ActivationEngine<'a> {
	queue: VecDeque<PluginDescriptor>,
	registry: ServiceRegistry,
	state: ActivationState,
	notifier: &'a LifecycleNotifier,
}

impl<'a> ActivationEngine<'a> {

	pub(crate) fn new( order: LoadOrder, notifier: &'a LifecycleNotifier ) -> Self {
		Self {
			queue: order.into_queue(),
			registry: ServiceRegistry::new(),
			state: ActivationState::Idle,
			notifier,
		}
	}

	/// Activates every queued plugin in order.
	///
	/// Emits `plugin activated` after each plugin and `ready` once the queue is
	/// empty. Failures are returned, not emitted; the caller reports them.
	pub(crate) async fn run( mut self ) -> Result<ServiceRegistry, ActivationError> {

		while let Some( descriptor ) = self.queue.pop_front() {

			self.transition( ActivationState::Activating( descriptor.id().clone() ));
			let span = tracing::info_span!( "activate", plugin = %descriptor.id() );

			if let Err( err ) = self.activate( &descriptor ).instrument( span ).await {
				self.transition( ActivationState::Failed );
				tracing::error!( plugin = %descriptor.id(), error = %err, "Plugin activation failed" );
				return Err( err )
			}

			self.notifier.plugin_activated( descriptor.id() );
			self.transition( ActivationState::Idle );

		}

		self.transition( ActivationState::AllReady );
		tracing::info!( services = self.registry.len(), "All plugins ready" );
		self.notifier.ready( &self.registry );
		Ok( self.registry )

	}

	async fn activate( &mut self, descriptor: &PluginDescriptor ) -> Result<(), ActivationError> {

		let plugin = descriptor.id();
		let activation_failed = | source: BoxError | ActivationError::PluginActivation { plugin: plugin.clone(), source };

		let imports = self.imports_for( descriptor );
		let ( handle, completion ) = ExportHandle::channel();
		std::panic::catch_unwind( std::panic::AssertUnwindSafe(|| descriptor.factory().activate( descriptor, imports, handle )))
			.map_err(| payload | activation_failed( Box::new( FactoryPanicked::from_payload( payload.as_ref() ))))?
			.map_err( activation_failed )?;

		tracing::debug!( "Waiting for plugin exports" );
		let provided = completion.await
			.map_err(| _ | activation_failed( Box::new( ExportHandleDropped )))?
			.map_err( activation_failed )?;

		let provided = qualify( descriptor, provided )?;

		if let Some( service ) = descriptor.exports().iter().find(| export | !provided.iter().any(|( name, _ )| name == *export )) {
			return Err( ActivationError::MissingExport { plugin: plugin.clone(), service: service.clone() })
		}

		let undeclared = provided.iter()
			.map(|( name, _ )| name )
			.filter(| name | !descriptor.exports().contains( *name ))
			.join( ", " );
		if !undeclared.is_empty() {
			tracing::warn!( services = %undeclared, "Plugin provided services it does not declare" );
		}

		let count = provided.len();
		self.registry.set_all( provided )
			.map_err(| source | ActivationError::DuplicateService { plugin: plugin.clone(), source })?;

		tracing::info!( services = count, "Plugin activated" );
		Ok(())

	}

	/// Binds each import under its alias.
	fn imports_for( &self, descriptor: &PluginDescriptor ) -> Imports {
		let mut imports = Imports::with_capacity( descriptor.imports().len() );
		descriptor.imports().iter().for_each(| import | {
			let service = self.registry.get( import.service().as_str() );
			// Every import is exported by a plugin earlier in the load order, and
			// that plugin's declared exports were checked before it was committed.
			debug_assert!( service.is_some(), "imported service {} missing from the registry", import.service() );
			if let Some( service ) = service {
				imports.bind( import.alias().to_string(), Service::clone( service ));
			}
		});
		imports
	}

	fn transition( &mut self, next: ActivationState ) {
		tracing::trace!( from = ?self.state, to = ?next, "Activation state change" );
		self.state = next ;
	}

}

impl std::fmt::Debug for ActivationEngine<'_> {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "ActivationEngine" )
			.field( "state", &self.state )
			.field( "queued", &self.queue.iter().map( PluginDescriptor::id ).collect::<Vec<_>>() )
			.field( "registry", &self.registry )
			.finish_non_exhaustive()
	}
}

/// Resolves every provided key against the plugin's scope, keeping provision order.
fn qualify( descriptor: &PluginDescriptor, provided: ProvidedServices ) -> Result<Vec<( QualifiedServiceName, Service )>, ActivationError> {
	provided.into_entries().into_iter()
		.map(|( name, service )| QualifiedServiceName::resolve( descriptor.scope(), &name )
			.map(| name | ( name, service ))
			.map_err(| source | ActivationError::InvalidServiceName { plugin: descriptor.id().clone(), source }))
		.collect()
}
