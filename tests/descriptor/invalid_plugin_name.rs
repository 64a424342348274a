use plugin_compose::{ DescriptorError, DescriptorTable, PluginConfig };

use crate::plugin_fixtures::provide_declared ;

fn build_one( id: &str ) -> Result<DescriptorTable, DescriptorError> {
	DescriptorTable::build([
		PluginConfig::new( id ).without_imports().exports([ "out" ]).factory( provide_declared() ),
	], None )
}

#[test]
fn descriptor_invalid_plugin_name() {
	for id in [ "a/b/c", "", "/name", "scope/" ] {
		match build_one( id ) {
			Err( DescriptorError::InvalidPluginName( err )) => assert_eq!( err.0, id ),
			Err( err ) => panic!( "Unexpected error for '{}': {}", id, err ),
			Ok( _ ) => panic!( "Expected '{}' to be rejected", id ),
		}
	}
}

#[test]
fn descriptor_unscoped_plugin_name_is_its_own_scope() {
	let table = build_one( "db" ).unwrap();
	assert_eq!( table.first().scope(), "db" );
	assert_eq!( table.first().exports()[ 0 ].as_str(), "db/out" );
}
