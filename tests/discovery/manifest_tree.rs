use plugin_compose::{ AppBuilder, FactoryCatalog, FileSystemSource, PluginConfig, PluginSource, PluginId };

use crate::manifest_fixtures::write_manifest ;
use crate::plugin_fixtures::{ ids, provide_declared };

fn catalog() -> FactoryCatalog {
	FactoryCatalog::new()
		.with_shared( "blog-db", provide_declared() )
		.with_shared( "blog/model", provide_declared() )
		.with_shared( "net.snapserv/http", provide_declared() )
}

#[test]
fn discovery_reads_manifest() {

	let root = tempfile::tempdir().unwrap();
	write_manifest( root.path(), "blog/db", r#"
		entry-point = "blog-db"
		exports = [ "store" ]
	"# );

	let source = FileSystemSource::new( root.path(), catalog() );
	let metadata = source.metadata( &"blog/db".parse::<PluginId>().unwrap() ).unwrap();

	assert_eq!( metadata.scope.as_deref(), Some( "blog" ));
	assert_eq!( metadata.entry_point, "blog-db" );
	assert!( metadata.imports.is_empty() );
	assert_eq!( metadata.exports, [ "store" ]);
	assert_eq!( source.plugin_dir( &"blog/db".parse().unwrap() ), root.path().join( "plugins" ).join( "blog" ).join( "db" ));

}

#[test]
fn discovery_entry_point_defaults_to_plugin_id() {

	let root = tempfile::tempdir().unwrap();
	write_manifest( root.path(), "blog/model", "" );

	let metadata = FileSystemSource::new( root.path(), catalog() )
		.metadata( &"blog/model".parse().unwrap() )
		.unwrap();

	assert_eq!( metadata.entry_point, "blog/model" );
	assert!( metadata.exports.is_empty() );

}

#[tokio::test]
async fn discovery_starts_an_application_from_manifests() {

	let root = tempfile::tempdir().unwrap();
	write_manifest( root.path(), "blog/db", r#"
		entry-point = "blog-db"
		exports = [ "store" ]
	"# );
	write_manifest( root.path(), "blog/model", r#"
		imports = [[ "db", "store" ], [ "server", "net.snapserv/http" ]]
		exports = [ "post" ]
	"# );
	write_manifest( root.path(), "net.snapserv/http", r#"
		exports = [ "http" ]
	"# );

	let app = AppBuilder::new()
		.with_source( FileSystemSource::new( root.path(), catalog() ))
		.with_plugins([ "blog/model", "blog/db", "net.snapserv/http" ])
		.start().await
		.unwrap();

	assert_eq!( ids( app.load_order() ), [ "blog/db", "net.snapserv/http", "blog/model" ]);
	assert!( app.registry().contains( "blog/post" ));

}

#[tokio::test]
async fn discovery_explicit_configuration_wins() {

	let root = tempfile::tempdir().unwrap();
	write_manifest( root.path(), "blog/db", r#"
		entry-point = "blog-db"
		exports = [ "store", "migrations" ]
	"# );

	let app = AppBuilder::new()
		.with_source( FileSystemSource::new( root.path(), catalog() ))
		.with_plugin( PluginConfig::new( "blog/db" ).export( "store" ))
		.start().await
		.unwrap();

	assert_eq!( app.registry().names().map(| name | name.as_str() ).collect::<Vec<_>>(), [ "blog/store" ]);

}
