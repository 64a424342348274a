//! The contract between the activation engine and plugin code.
//!
//! A plugin is activated by calling its [`PluginFactory`] with the services it
//! imported. The factory answers exactly once through the [`ExportHandle`] it is
//! given, either right away or later from some other task. Because answering
//! consumes the handle, a plugin can not report its exports twice.

use std::any::Any ;
use std::collections::HashMap ;
use std::sync::Arc ;
use tokio::sync::oneshot ;

use crate::descriptor::PluginDescriptor ;



/// An opaque service value, shared between the registry and every plugin that imports it.
pub type Service = Arc<dyn Any + Send + Sync> ;

/// Error type plugins use to report activation failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync> ;

/// Entry point of a plugin.
///
/// `activate` runs on the engine's task. Returning `Err` is treated like a
/// synchronous throw and halts startup. Returning `Ok` means the plugin has
/// taken responsibility for eventually using `exports`; the engine waits for it.
///
/// Any `Fn( &PluginDescriptor, Imports, ExportHandle ) -> Result<(), BoxError>`
/// closure is a factory.
///
/// ```
/// use plugin_compose::{ PluginFactory, PluginDescriptor, Imports, ExportHandle, ProvidedServices, BoxError };
///
/// struct Database ;
///
/// impl PluginFactory for Database {
/// 	fn activate( &self, _: &PluginDescriptor, _: Imports, exports: ExportHandle ) -> Result<(), BoxError> {
/// 		exports.provide( ProvidedServices::new().with( "store", String::from( "connected" )));
/// 		Ok(())
/// 	}
/// }
/// ```
pub trait PluginFactory: Send + Sync {
	/// Starts the plugin.
	///
	/// # Errors
	/// Any error returned here aborts the whole startup sequence.
	fn activate(
		&self,
		descriptor: &PluginDescriptor,
		imports: Imports,
		exports: ExportHandle,
	) -> Result<(), BoxError> ;
}

impl<F> PluginFactory for F
where
	F: Fn( &PluginDescriptor, Imports, ExportHandle ) -> Result<(), BoxError> + Send + Sync,
{
	fn activate( &self, descriptor: &PluginDescriptor, imports: Imports, exports: ExportHandle ) -> Result<(), BoxError> {
		self( descriptor, imports, exports )
	}
}

/// Shared handle to a factory; descriptors are cheap to clone.
pub type SharedFactory = Arc<dyn PluginFactory> ;

/// Wraps a closure as a [`SharedFactory`].
///
/// Going through this function pins the closure to the higher-ranked signature
/// the engine calls it with, which plain `Arc::new( | .. | .. )` does not infer.
pub fn factory_fn<F>( activate: F ) -> SharedFactory
where
	F: Fn( &PluginDescriptor, Imports, ExportHandle ) -> Result<(), BoxError> + Send + Sync + 'static,
{
	Arc::new( activate )
}

/// Services a plugin imported, keyed by the alias it chose for each of them.
#[derive( Clone, Default )]
pub struct Imports {
	bindings: HashMap<String, Service>,
}

impl Imports {

	pub(crate) fn with_capacity( capacity: usize ) -> Self {
		Self { bindings: HashMap::with_capacity( capacity )}
	}

	pub(crate) fn bind( &mut self, alias: String, service: Service ) {
		self.bindings.insert( alias, service );
	}

	/// The service bound under `alias`.
	pub fn get( &self, alias: &str ) -> Option<&Service> { self.bindings.get( alias ) }

	/// The service bound under `alias`, if it has type `T`.
	pub fn get_as<T: Any + Send + Sync>( &self, alias: &str ) -> Option<Arc<T>> {
		self.bindings.get( alias ).cloned().and_then(| service | service.downcast::<T>().ok() )
	}

	/// All aliases that were bound.
	pub fn aliases( &self ) -> impl Iterator<Item = &str> { self.bindings.keys().map( String::as_str ) }

	#[inline] pub fn len( &self ) -> usize { self.bindings.len() }
	#[inline] pub fn is_empty( &self ) -> bool { self.bindings.is_empty() }

}

impl std::fmt::Debug for Imports {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_set().entries( self.bindings.keys() ).finish()
	}
}

/// The services a plugin hands back on activation.
///
/// Keys may be unqualified; they are resolved against the plugin's scope
/// before they reach the registry. Insertion order is kept so registration
/// order is predictable.
#[derive( Clone, Default )]
pub struct ProvidedServices {
	entries: Vec<( String, Service )>,
}

impl ProvidedServices {

	pub fn new() -> Self { Self::default() }

	/// Builder form of [`insert`]( Self::insert ).
	pub fn with( mut self, name: impl Into<String>, service: impl Any + Send + Sync ) -> Self {
		self.insert( name, service );
		self
	}

	/// Adds a service. A later entry with the same key replaces the earlier one.
	pub fn insert( &mut self, name: impl Into<String>, service: impl Any + Send + Sync ) {
		self.insert_shared( name, Arc::new( service ));
	}

	/// Adds an already shared service, e.g. one that was imported and is re-exported.
	pub fn insert_shared( &mut self, name: impl Into<String>, service: Service ) {
		let name = name.into();
		match self.entries.iter_mut().find(|( key, _ )| *key == name ) {
			Some(( _, slot )) => *slot = service,
			None => self.entries.push(( name, service )),
		}
	}

	#[inline] pub fn len( &self ) -> usize { self.entries.len() }
	#[inline] pub fn is_empty( &self ) -> bool { self.entries.is_empty() }

	pub(crate) fn into_entries( self ) -> Vec<( String, Service )> { self.entries }

}

impl std::fmt::Debug for ProvidedServices {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_list().entries( self.entries.iter().map(|( name, _ )| name )).finish()
	}
}

pub(crate) type Completion = Result<ProvidedServices, BoxError> ;

/// Single-use completion handle passed to [`PluginFactory::activate`].
///
/// Dropping it without answering fails the activation of its plugin.
#[must_use = "the engine waits until the plugin hands back its exports"]
pub struct ExportHandle {
	sender: oneshot::Sender<Completion>,
}

impl ExportHandle {

	pub(crate) fn channel() -> ( Self, oneshot::Receiver<Completion> ) {
		let ( sender, receiver ) = oneshot::channel();
		( Self { sender }, receiver )
	}

	/// Reports successful activation with the services this plugin provides.
	pub fn provide( self, services: ProvidedServices ) {
		self.complete( Ok( services ));
	}

	/// Reports that activation failed.
	pub fn fail( self, error: impl Into<BoxError> ) {
		self.complete( Err( error.into() ));
	}

	/// Reports either outcome.
	pub fn complete( self, result: Result<ProvidedServices, BoxError> ) {
		// The receiver is only gone if startup was abandoned.
		let _ = self.sender.send( result );
	}

}

impl std::fmt::Debug for ExportHandle {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "ExportHandle" ).finish_non_exhaustive()
	}
}
