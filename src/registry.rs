use std::any::Any ;
use std::collections::{ HashMap, HashSet };
use std::sync::Arc ;
use thiserror::Error ;

use crate::factory::Service ;
use crate::service_name::QualifiedServiceName ;



/// A service name was registered a second time.
#[derive( Debug, Clone, PartialEq, Eq, Error )]
#[error( "Service {service} is already registered" )]
pub struct DuplicateServiceError {
	pub service: QualifiedServiceName,
}

/// Every service provided so far, keyed by qualified name.
///
/// Each name can be written once. The registry only grows; services are
/// never removed or replaced.
#[derive( Default, Clone )]
pub struct ServiceRegistry {
	services: HashMap<QualifiedServiceName, Service>,
	order: Vec<QualifiedServiceName>,
}

impl ServiceRegistry {

	pub fn new() -> Self { Self::default() }

	/// The service registered under `name`.
	pub fn get( &self, name: &str ) -> Option<&Service> { self.services.get( name ) }

	/// The service registered under `name`, if it has type `T`.
	pub fn get_as<T: Any + Send + Sync>( &self, name: &str ) -> Option<Arc<T>> {
		self.services.get( name ).cloned().and_then(| service | service.downcast::<T>().ok() )
	}

	pub fn contains( &self, name: &str ) -> bool { self.services.contains_key( name ) }

	/// Registers `service` under `name`.
	///
	/// # Errors
	/// Fails without touching the registry if `name` is already taken.
	pub fn set( &mut self, name: QualifiedServiceName, service: Service ) -> Result<(), DuplicateServiceError> {
		if self.services.contains_key( &name ) { return Err( DuplicateServiceError { service: name })}
		self.order.push( name.clone() );
		self.services.insert( name, service );
		Ok(())
	}

	/// Registers a batch of services, all or nothing.
	///
	/// Collisions with existing names and within the batch itself are checked
	/// before anything is written, so readers never see half a batch.
	pub(crate) fn set_all( &mut self, batch: Vec<( QualifiedServiceName, Service )> ) -> Result<(), DuplicateServiceError> {
		let mut seen = HashSet::with_capacity( batch.len() );
		if let Some(( name, _ )) = batch.iter().find(|( name, _ )| self.services.contains_key( name ) || !seen.insert( name )) {
			return Err( DuplicateServiceError { service: name.clone() });
		}
		batch.into_iter().try_for_each(|( name, service )| self.set( name, service ))
	}

	/// Registered names, oldest first.
	pub fn names( &self ) -> impl Iterator<Item = &QualifiedServiceName> { self.order.iter() }

	#[inline] pub fn len( &self ) -> usize { self.services.len() }
	#[inline] pub fn is_empty( &self ) -> bool { self.services.is_empty() }

}

impl std::fmt::Debug for ServiceRegistry {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_set().entries( self.order.iter().map( QualifiedServiceName::as_str )).finish()
	}
}
