#[allow( dead_code )]
mod manifest_fixtures {

	use std::path::Path ;

	/// Writes `<root>/plugins/<plugin>/manifest.toml`.
	pub fn write_manifest( root: &Path, plugin: &str, manifest: &str ) {
		let plugin_dir = root.join( "plugins" ).join( plugin );
		std::fs::create_dir_all( &plugin_dir ).unwrap();
		std::fs::write( plugin_dir.join( "manifest.toml" ), manifest ).unwrap();
	}

	/// Creates an empty plugin directory with no manifest in it.
	pub fn create_plugin_dir( root: &Path, plugin: &str ) {
		std::fs::create_dir_all( root.join( "plugins" ).join( plugin )).unwrap();
	}

}
