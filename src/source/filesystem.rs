use std::path::{ Path, PathBuf };
use serde::Deserialize ;

use crate::plugin_id::PluginId ;
use super::{ FactoryCatalog, PluginMetadata, PluginSource, SourceError };



/// File name of a plugin's manifest inside its directory.
pub const MANIFEST_FILE: &str = "manifest.toml" ;

/// Discovers plugins in `<root>/plugins/<scope>/<name>/manifest.toml`.
///
/// A manifest declares what the plugin imports and exports and which entry
/// point of the [`FactoryCatalog`] builds it:
///
/// ```toml
/// entry-point = "blog-model"   # defaults to the plugin id
/// imports = [[ "db", "db" ], [ "server", "net.snapserv/http" ]]
/// exports = [ "model" ]
/// ```
///
/// Both lists default to empty.
#[derive( Debug, Clone )]
pub struct FileSystemSource {
	plugins_dir: PathBuf,
	catalog: FactoryCatalog,
}

impl FileSystemSource {

	/// Looks for plugins below `root/plugins`.
	pub fn new( root: impl AsRef<Path>, catalog: FactoryCatalog ) -> Self {
		Self { plugins_dir: root.as_ref().join( "plugins" ), catalog }
	}

	/// Directory a plugin is expected in.
	pub fn plugin_dir( &self, plugin: &PluginId ) -> PathBuf {
		self.plugins_dir.join( plugin.scope() ).join( plugin.name() )
	}

}

#[derive( Debug, Deserialize )]
#[serde( rename_all = "kebab-case" )]
struct ManifestData {
	#[serde( default )]
	entry_point: Option<String>,
	#[serde( default )]
	imports: Vec<( String, String )>,
	#[serde( default )]
	exports: Vec<String>,
}

impl PluginSource for FileSystemSource {

	fn metadata( &self, plugin: &PluginId ) -> Result<PluginMetadata, SourceError> {

		if !plugin.is_scoped() { return Err( SourceError::InvalidPluginName( plugin.clone() )) }

		let plugin_dir = self.plugin_dir( plugin );
		if !plugin_dir.is_dir() { return Err( SourceError::NotFound( plugin.clone() )) }

		let manifest_path = plugin_dir.join( MANIFEST_FILE );
		tracing::debug!( plugin = %plugin, path = %manifest_path.display(), "Reading plugin manifest" );

		let manifest = std::fs::read_to_string( &manifest_path )
			.map_err(| source | SourceError::Io { plugin: plugin.clone(), source })?;
		let manifest: ManifestData = toml::from_str( &manifest )
			.map_err(| err | SourceError::CorruptedMetadata { plugin: plugin.clone(), reason: err.to_string() })?;

		let entry_point = manifest.entry_point.unwrap_or_else(|| plugin.to_string() );
		let factory = self.catalog.get( &entry_point )
			.ok_or_else(|| SourceError::UnknownEntryPoint { plugin: plugin.clone(), entry_point: entry_point.clone() })?;

		Ok( PluginMetadata {
			scope: Some( plugin.scope().to_string() ),
			imports: manifest.imports,
			exports: manifest.exports,
			entry_point,
			factory,
		})

	}

}
