//! Qualified service names and the scope resolution rule.
//!
//! Every service lives under exactly one scope: `scope/local-name`. Plugins
//! may refer to services of their own scope without the prefix, so every
//! name a plugin declares is passed through [`QualifiedServiceName::resolve`]
//! together with that plugin's scope before it is used for matching.

use thiserror::Error ;



/// Separates the scope from the local part of a service name.
pub const SCOPE_SEPARATOR: char = '/' ;

/// A service name failed validation.
#[derive( Debug, Clone, PartialEq, Eq, Error )]
pub enum ServiceNameError {
	/// The name spans more than one scope boundary.
	#[error( "Invalid service name '{0}': a service name can not have more than one scope" )]
	TooManyScopes( String ),
	/// The name has no scope and there is nothing to resolve it against.
	#[error( "Invalid service name '{0}': missing scope" )]
	Unscoped( String ),
	/// The scope or the local part is empty.
	#[error( "Invalid service name '{0}': empty scope or local name" )]
	Empty( String ),
}

impl ServiceNameError {
	/// The offending name as it was declared.
	pub fn name( &self ) -> &str {
		match self {
			Self::TooManyScopes( name ) | Self::Unscoped( name ) | Self::Empty( name ) => name,
		}
	}
}

/// A globally unique service key of the form `scope/local-name`.
///
/// Only constructed through [`resolve`]( Self::resolve ) or [`FromStr`]( std::str::FromStr ),
/// both of which guarantee exactly one separator with non-empty parts on either side.
#[derive( Debug, Clone )]
pub struct QualifiedServiceName {
	full: String,
	split: usize,
}

impl QualifiedServiceName {

	/// Resolves `name` against `scope`.
	///
	/// - A name that already carries one scope is returned as is (cross-scope reference).
	/// - A name without a scope is placed under `scope`.
	///
	/// ```
	/// use plugin_compose::QualifiedServiceName ;
	///
	/// let local = QualifiedServiceName::resolve( "fusion-blog", "db" ).unwrap();
	/// assert_eq!( local.as_str(), "fusion-blog/db" );
	///
	/// let foreign = QualifiedServiceName::resolve( "fusion-blog", "net.snapserv/http" ).unwrap();
	/// assert_eq!( foreign.as_str(), "net.snapserv/http" );
	///
	/// assert!( QualifiedServiceName::resolve( "fusion-blog", "a/b/c" ).is_err() );
	/// ```
	///
	/// # Errors
	/// Fails if the qualified name would contain more than one separator, or if either part is empty.
	pub fn resolve( scope: &str, name: &str ) -> Result<Self, ServiceNameError> {
		match name.matches( SCOPE_SEPARATOR ).count() {
			0 if scope.is_empty() => Err( ServiceNameError::Unscoped( name.to_string() )),
			0 => Self::from_parts( scope, name ),
			1 => name.parse(),
			_ => Err( ServiceNameError::TooManyScopes( name.to_string() )),
		}
	}

	fn from_parts( scope: &str, local: &str ) -> Result<Self, ServiceNameError> {
		let full = format!( "{}{}{}", scope, SCOPE_SEPARATOR, local );
		if scope.contains( SCOPE_SEPARATOR ) {
			return Err( ServiceNameError::TooManyScopes( full ));
		}
		if scope.is_empty() || local.is_empty() {
			return Err( ServiceNameError::Empty( full ));
		}
		Ok( Self { full, split: scope.len() })
	}

	/// The scope part, before the separator.
	#[inline] pub fn scope( &self ) -> &str { &self.full[ ..self.split ] }

	/// The local part, after the separator.
	#[inline] pub fn local_name( &self ) -> &str { &self.full[ self.split + 1.. ] }

	/// The full `scope/local-name` string.
	#[inline] pub fn as_str( &self ) -> &str { &self.full }

}

// Identity is the full string only, so that lookups through `Borrow<str>` agree.
impl PartialEq for QualifiedServiceName {
	fn eq( &self, other: &Self ) -> bool { self.full == other.full }
}
impl Eq for QualifiedServiceName {}

impl std::hash::Hash for QualifiedServiceName {
	fn hash<H: std::hash::Hasher>( &self, state: &mut H ) { self.full.hash( state ) }
}

impl PartialOrd for QualifiedServiceName {
	fn partial_cmp( &self, other: &Self ) -> Option<std::cmp::Ordering> { Some( self.cmp( other )) }
}
impl Ord for QualifiedServiceName {
	fn cmp( &self, other: &Self ) -> std::cmp::Ordering { self.full.cmp( &other.full ) }
}

impl std::str::FromStr for QualifiedServiceName {
	type Err = ServiceNameError ;

	/// Parses an already qualified name. Unlike [`QualifiedServiceName::resolve`]
	/// there is no scope to fall back on, so an unscoped name is rejected.
	fn from_str( name: &str ) -> Result<Self, Self::Err> {
		let mut parts = name.split( SCOPE_SEPARATOR );
		match ( parts.next(), parts.next(), parts.next() ) {
			( Some( scope ), Some( local ), None ) => Self::from_parts( scope, local ),
			( Some( _ ), None, _ ) => Err( ServiceNameError::Unscoped( name.to_string() )),
			_ => Err( ServiceNameError::TooManyScopes( name.to_string() )),
		}
	}
}

impl std::fmt::Display for QualifiedServiceName {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.write_str( &self.full )
	}
}

impl AsRef<str> for QualifiedServiceName {
	fn as_ref( &self ) -> &str { &self.full }
}

impl std::borrow::Borrow<str> for QualifiedServiceName {
	fn borrow( &self ) -> &str { &self.full }
}

impl From<QualifiedServiceName> for String {
	fn from( name: QualifiedServiceName ) -> Self { name.full }
}
