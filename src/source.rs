//! Plugin discovery.
//!
//! When a configured plugin does not come with a factory, its metadata is
//! looked up through a [`PluginSource`]. The source can be anything: manifest
//! files on disk, plugins compiled into the binary, a database. The crate
//! ships [`FileSystemSource`], which reads manifest files laid out per scope.

mod filesystem ;

use std::collections::HashMap ;
use std::sync::Arc ;
use thiserror::Error ;

use crate::factory::{ PluginFactory, SharedFactory };
use crate::plugin_id::PluginId ;

pub use filesystem::FileSystemSource ;



/// Metadata a [`PluginSource`] knows about a plugin.
///
/// Service names are as declared: they may be unqualified and are resolved
/// against the plugin's scope when the descriptor table is built.
#[derive( Clone )]
pub struct PluginMetadata {
	/// Scope for unqualified names; `None` falls back to the plugin id's scope.
	pub scope: Option<String>,
	/// `( alias, service )` pairs.
	pub imports: Vec<( String, String )>,
	/// Exported service names.
	pub exports: Vec<String>,
	/// Name the factory was found under.
	pub entry_point: String,
	/// The plugin's factory.
	pub factory: SharedFactory,
}

impl std::fmt::Debug for PluginMetadata {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "PluginMetadata" )
			.field( "scope", &self.scope )
			.field( "imports", &self.imports )
			.field( "exports", &self.exports )
			.field( "entry_point", &self.entry_point )
			.finish_non_exhaustive()
	}
}

/// Failure to look up a plugin.
#[derive( Debug, Error )]
pub enum SourceError {
	/// The source has no plugin with this id.
	#[error( "Plugin not found: {0}" )]
	NotFound( PluginId ),
	/// The source can only locate plugins whose id has the `scope/name` shape.
	#[error( "Invalid plugin name: {0}. Each plugin should have exactly one scope" )]
	InvalidPluginName( PluginId ),
	/// The plugin exists but its metadata could not be read or parsed.
	#[error( "Could not load metadata of plugin {plugin}: {reason}" )]
	CorruptedMetadata { plugin: PluginId, reason: String },
	/// The metadata names an entry point no factory is registered for.
	#[error( "Plugin {plugin} names unknown entry point '{entry_point}'" )]
	UnknownEntryPoint { plugin: PluginId, entry_point: String },
	/// I/O failure while reading the plugin.
	#[error( "Failed to read plugin {plugin}: {source}" )]
	Io { plugin: PluginId, source: std::io::Error },
}

/// Looks up plugin metadata by id.
pub trait PluginSource: Send + Sync {
	/// Returns the metadata and factory of `plugin`.
	///
	/// # Errors
	/// Fails if the plugin can not be found or its metadata is malformed.
	fn metadata( &self, plugin: &PluginId ) -> Result<PluginMetadata, SourceError> ;
}

/// Factories available to a [`PluginSource`], keyed by entry point name.
///
/// Stands in for loading code from a path: a plugin's metadata names an entry
/// point, and the catalog maps that name to a factory compiled into the host.
#[derive( Clone, Default )]
pub struct FactoryCatalog {
	factories: HashMap<String, SharedFactory>,
}

impl FactoryCatalog {

	pub fn new() -> Self { Self::default() }

	/// Registers `factory` under `entry_point`, replacing any earlier one.
	pub fn with( mut self, entry_point: impl Into<String>, factory: impl PluginFactory + 'static ) -> Self {
		self.insert( entry_point, Arc::new( factory ));
		self
	}

	/// Builder form of [`insert`]( Self::insert ), for factories built with [`factory_fn`]( crate::factory_fn ).
	pub fn with_shared( mut self, entry_point: impl Into<String>, factory: SharedFactory ) -> Self {
		self.insert( entry_point, factory );
		self
	}

	/// Registers an already shared factory.
	pub fn insert( &mut self, entry_point: impl Into<String>, factory: SharedFactory ) {
		self.factories.insert( entry_point.into(), factory );
	}

	/// The factory registered under `entry_point`.
	pub fn get( &self, entry_point: &str ) -> Option<SharedFactory> {
		self.factories.get( entry_point ).cloned()
	}

}

impl std::fmt::Debug for FactoryCatalog {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_set().entries( self.factories.keys() ).finish()
	}
}
