//! Configuration entries, one per plugin to load.
//!
//! An application is configured as an ordered list of [`PluginConfig`] entries.
//! Each entry is either a bare plugin id or a detailed table. Fields left out
//! of a detailed entry are filled in from the plugin's discovered metadata;
//! anything that is not a known field is passed to the plugin as an option.
//!
//! ```
//! use plugin_compose::PluginConfig ;
//!
//! let plugins: Vec<PluginConfig> = serde_json::from_str( r#"[
//! 	"fusion-blog/model",
//! 	"fusion-blog/db",
//! 	{ "id": "fusion-blog/http", "port": 8080 }
//! ]"# ).unwrap();
//!
//! assert_eq!( plugins[ 0 ].id(), "fusion-blog/model" );
//! assert_eq!( plugins[ 2 ].options().get( "port" ), Some( &serde_json::json!( 8080 )));
//! ```

use serde::Deserialize ;
use serde_json::{ Map, Value };

use crate::factory::SharedFactory ;



/// A single configured plugin.
#[derive( Debug, Clone, Deserialize )]
#[serde( untagged )]
pub enum PluginConfig {
	/// Shorthand for a plugin with no extra options.
	Name( String ),
	/// A plugin with explicit fields and/or options.
	Detailed( DetailedPluginConfig ),
}

impl PluginConfig {

	/// Starts a detailed entry for the plugin `id`.
	pub fn new( id: impl Into<String> ) -> Self {
		Self::Detailed( DetailedPluginConfig { id: id.into(), ..DetailedPluginConfig::default() })
	}

	/// The configured plugin id, not yet validated.
	pub fn id( &self ) -> &str {
		match self {
			Self::Name( id ) => id,
			Self::Detailed( detailed ) => &detailed.id,
		}
	}

	/// Free-form options for the plugin. Empty for the shorthand form.
	pub fn options( &self ) -> &Map<String, Value> {
		static EMPTY: std::sync::OnceLock<Map<String, Value>> = std::sync::OnceLock::new();
		match self {
			Self::Name( _ ) => EMPTY.get_or_init( Map::new ),
			Self::Detailed( detailed ) => &detailed.options,
		}
	}

	/// Sets the scope unqualified service names resolve against.
	pub fn scope( self, scope: impl Into<String> ) -> Self {
		self.map_detailed(| detailed | detailed.scope = Some( scope.into() ))
	}

	/// Declares one import. The first call marks the import list as explicit.
	pub fn import( self, alias: impl Into<String>, service: impl Into<String> ) -> Self {
		self.map_detailed(| detailed | detailed.imports.get_or_insert_with( Vec::new ).push(( alias.into(), service.into() )))
	}

	/// Replaces the import list. An empty list still counts as explicit.
	pub fn imports<A: Into<String>, S: Into<String>>( self, imports: impl IntoIterator<Item = ( A, S )> ) -> Self {
		self.map_detailed(| detailed | detailed.imports = Some(
			imports.into_iter().map(|( alias, service )| ( alias.into(), service.into() )).collect()
		))
	}

	/// Marks the plugin as importing nothing.
	pub fn without_imports( self ) -> Self {
		self.map_detailed(| detailed | detailed.imports = Some( Vec::new() ))
	}

	/// Declares one export. The first call marks the export list as explicit.
	pub fn export( self, service: impl Into<String> ) -> Self {
		self.map_detailed(| detailed | detailed.exports.get_or_insert_with( Vec::new ).push( service.into() ))
	}

	/// Replaces the export list. An empty list still counts as explicit.
	pub fn exports( self, exports: impl IntoIterator<Item = impl Into<String>> ) -> Self {
		self.map_detailed(| detailed | detailed.exports = Some( exports.into_iter().map( Into::into ).collect() ))
	}

	/// Supplies the factory directly, bypassing discovery.
	pub fn factory( self, factory: SharedFactory ) -> Self {
		self.map_detailed(| detailed | detailed.factory = Some( factory ))
	}

	/// Adds a free-form option passed to the plugin's factory.
	pub fn option( self, key: impl Into<String>, value: impl Into<Value> ) -> Self {
		self.map_detailed(| detailed | { detailed.options.insert( key.into(), value.into() ); })
	}

	pub(crate) fn into_detailed( self ) -> DetailedPluginConfig {
		match self {
			Self::Name( id ) => DetailedPluginConfig { id, ..DetailedPluginConfig::default() },
			Self::Detailed( detailed ) => detailed,
		}
	}

	fn map_detailed( self, update: impl FnOnce( &mut DetailedPluginConfig )) -> Self {
		let mut detailed = self.into_detailed();
		update( &mut detailed );
		Self::Detailed( detailed )
	}

}

impl From<&str> for PluginConfig {
	fn from( id: &str ) -> Self { Self::Name( id.to_string() ) }
}

impl From<String> for PluginConfig {
	fn from( id: String ) -> Self { Self::Name( id ) }
}

/// The explicit form of a [`PluginConfig`].
///
/// `None` means "not configured"; such fields are taken from discovery.
#[derive( Clone, Default, Deserialize )]
#[serde( rename_all = "kebab-case" )]
pub struct DetailedPluginConfig {
	/// Plugin id, usually `scope/name`.
	#[serde( alias = "plugin-name" )]
	pub id: String,
	/// Scope for unqualified service names; defaults to the id's scope.
	#[serde( default )]
	pub scope: Option<String>,
	/// `( alias, service )` pairs.
	#[serde( default )]
	pub imports: Option<Vec<( String, String )>>,
	/// Exported service names.
	#[serde( default )]
	pub exports: Option<Vec<String>>,
	/// Factory supplied in code; never read from configuration.
	#[serde( skip )]
	pub factory: Option<SharedFactory>,
	/// Every other key of the entry.
	#[serde( flatten )]
	pub options: Map<String, Value>,
}

impl std::fmt::Debug for DetailedPluginConfig {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "DetailedPluginConfig" )
			.field( "id", &self.id )
			.field( "scope", &self.scope )
			.field( "imports", &self.imports )
			.field( "exports", &self.exports )
			.field( "factory", &self.factory.as_ref().map(| _ | "<factory>" ))
			.field( "options", &self.options )
			.finish()
	}
}
