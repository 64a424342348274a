//! Startup notifications for the embedding application.
//!
//! Listeners are registered on the [`AppBuilder`]( crate::AppBuilder ) and are
//! called in registration order. Every run ends with exactly one of
//! [`on_ready`]( LifecycleListener::on_ready ) or
//! [`on_error`]( LifecycleListener::on_error ), preceded by one
//! [`on_plugin_activated`]( LifecycleListener::on_plugin_activated ) per plugin
//! that came up.

use tokio::sync::mpsc::UnboundedSender ;

use crate::app::StartupError ;
use crate::plugin_id::PluginId ;
use crate::registry::ServiceRegistry ;



/// Receives startup events. Every method defaults to doing nothing.
pub trait LifecycleListener: Send + Sync {
	/// A plugin finished activating and its services are registered.
	fn on_plugin_activated( &self, _plugin: &PluginId ) {}
	/// Every plugin is active.
	fn on_ready( &self, _registry: &ServiceRegistry ) {}
	/// Startup halted.
	fn on_error( &self, _error: &StartupError ) {}
}

/// An owned copy of a lifecycle notification, for sending across tasks.
#[derive( Debug, Clone, PartialEq, Eq )]
pub enum LifecycleEvent {
	PluginActivated( PluginId ),
	/// Carries the registered service names in registration order.
	Ready( Vec<String> ),
	/// Carries the rendered error.
	Error( String ),
}

/// Forwards every notification into an unbounded channel.
///
/// A closed receiver is ignored: nobody is interested anymore.
impl LifecycleListener for UnboundedSender<LifecycleEvent> {
	fn on_plugin_activated( &self, plugin: &PluginId ) {
		let _ = self.send( LifecycleEvent::PluginActivated( plugin.clone() ));
	}
	fn on_ready( &self, registry: &ServiceRegistry ) {
		let _ = self.send( LifecycleEvent::Ready( registry.names().map( ToString::to_string ).collect() ));
	}
	fn on_error( &self, error: &StartupError ) {
		let _ = self.send( LifecycleEvent::Error( error.to_string() ));
	}
}

/// A listener assembled from closures, one per event of interest.
///
/// ```
/// use std::sync::atomic::{ AtomicUsize, Ordering };
/// use std::sync::Arc ;
/// use plugin_compose::FnListener ;
///
/// let activated = Arc::new( AtomicUsize::new( 0 ));
/// let counter = Arc::clone( &activated );
/// let listener = FnListener::new()
/// 	.on_plugin_activated( move | _ | { counter.fetch_add( 1, Ordering::SeqCst ); })
/// 	.on_error(| error | eprintln!( "startup failed: {error}" ));
/// # let _ = listener ;
/// ```
#[derive( Default )]
#[must_use = "register the listener with AppBuilder::with_listener"]
pub struct FnListener {
	activated: Option<Box<dyn Fn( &PluginId ) + Send + Sync>>,
	ready: Option<Box<dyn Fn( &ServiceRegistry ) + Send + Sync>>,
	error: Option<Box<dyn Fn( &StartupError ) + Send + Sync>>,
}

impl FnListener {

	pub fn new() -> Self { Self::default() }

	pub fn on_plugin_activated( mut self, callback: impl Fn( &PluginId ) + Send + Sync + 'static ) -> Self {
		self.activated = Some( Box::new( callback ));
		self
	}

	pub fn on_ready( mut self, callback: impl Fn( &ServiceRegistry ) + Send + Sync + 'static ) -> Self {
		self.ready = Some( Box::new( callback ));
		self
	}

	pub fn on_error( mut self, callback: impl Fn( &StartupError ) + Send + Sync + 'static ) -> Self {
		self.error = Some( Box::new( callback ));
		self
	}

}

impl LifecycleListener for FnListener {
	fn on_plugin_activated( &self, plugin: &PluginId ) {
		if let Some( callback ) = &self.activated { callback( plugin ) }
	}
	fn on_ready( &self, registry: &ServiceRegistry ) {
		if let Some( callback ) = &self.ready { callback( registry ) }
	}
	fn on_error( &self, error: &StartupError ) {
		if let Some( callback ) = &self.error { callback( error ) }
	}
}

impl std::fmt::Debug for FnListener {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "FnListener" )
			.field( "on_plugin_activated", &self.activated.is_some() )
			.field( "on_ready", &self.ready.is_some() )
			.field( "on_error", &self.error.is_some() )
			.finish()
	}
}

/// Fans every notification out to the registered listeners.
#[derive( Default )]
pub(crate) struct LifecycleNotifier {
	listeners: Vec<Box<dyn LifecycleListener>>,
}

impl LifecycleNotifier {

	pub(crate) fn push( &mut self, listener: Box<dyn LifecycleListener> ) {
		self.listeners.push( listener );
	}

	#[inline] pub(crate) fn len( &self ) -> usize { self.listeners.len() }

	pub(crate) fn plugin_activated( &self, plugin: &PluginId ) {
		self.listeners.iter().for_each(| listener | listener.on_plugin_activated( plugin ));
	}

	pub(crate) fn ready( &self, registry: &ServiceRegistry ) {
		self.listeners.iter().for_each(| listener | listener.on_ready( registry ));
	}

	pub(crate) fn error( &self, error: &StartupError ) {
		self.listeners.iter().for_each(| listener | listener.on_error( error ));
	}

}

impl std::fmt::Debug for LifecycleNotifier {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "LifecycleNotifier" ).field( "listeners", &self.listeners.len() ).finish()
	}
}
