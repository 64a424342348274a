use thiserror::Error ;

use crate::service_name::SCOPE_SEPARATOR ;



/// A plugin identifier is empty or spans more than one scope.
#[derive( Debug, Clone, PartialEq, Eq, Error )]
#[error( "Invalid plugin name '{0}': each plugin should have exactly one scope" )]
pub struct PluginIdError( pub String );

/// Stable identifier of a plugin, usually `scope/name`.
///
/// Used for diagnostics, discovery and lifecycle events. It is never matched
/// against service names. An id without a separator is its own scope; plugins
/// located through a [`PluginSource`]( crate::PluginSource ) must be fully scoped.
#[derive( Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord )]
pub struct PluginId( String );

impl PluginId {

	/// Validates `id` as a plugin identifier.
	///
	/// # Errors
	/// Fails if `id` is empty, has an empty part, or contains more than one separator.
	pub fn new( id: impl Into<String> ) -> Result<Self, PluginIdError> {
		let id = id.into();
		let valid = match id.split_once( SCOPE_SEPARATOR ) {
			None => !id.is_empty(),
			Some(( scope, name )) => !scope.is_empty() && !name.is_empty() && !name.contains( SCOPE_SEPARATOR ),
		};
		match valid {
			true => Ok( Self( id )),
			false => Err( PluginIdError( id )),
		}
	}

	/// Whether the id has the full `scope/name` shape.
	pub fn is_scoped( &self ) -> bool { self.0.contains( SCOPE_SEPARATOR ) }

	/// The scope this plugin's unqualified service names resolve against
	/// when no explicit scope is configured.
	pub fn scope( &self ) -> &str {
		self.0.split_once( SCOPE_SEPARATOR ).map_or( self.0.as_str(), |( scope, _ )| scope )
	}

	/// The plugin name within its scope.
	pub fn name( &self ) -> &str {
		self.0.split_once( SCOPE_SEPARATOR ).map_or( self.0.as_str(), |( _, name )| name )
	}

	#[inline] pub fn as_str( &self ) -> &str { &self.0 }

}

impl std::str::FromStr for PluginId {
	type Err = PluginIdError ;
	fn from_str( id: &str ) -> Result<Self, Self::Err> { Self::new( id ) }
}

impl std::fmt::Display for PluginId {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result { f.write_str( &self.0 ) }
}

impl AsRef<str> for PluginId {
	fn as_ref( &self ) -> &str { &self.0 }
}

impl PartialEq<str> for PluginId {
	fn eq( &self, other: &str ) -> bool { self.0 == other }
}

impl PartialEq<&str> for PluginId {
	fn eq( &self, other: &&str ) -> bool { self.0 == *other }
}
