use plugin_compose::{ DescriptorTable, resolve };

use crate::plugin_fixtures::{ ids, plugin };

#[test]
fn resolution_linear_chain() {

	crate::tracing_init::init();

	// Configured back to front on purpose.
	let table = DescriptorTable::build([
		plugin( "http", &[ "model/post" ], &[ "server" ]),
		plugin( "model", &[ "db/store" ], &[ "post" ]),
		plugin( "db", &[], &[ "store" ]),
	], None ).unwrap();

	let order = resolve( table ).unwrap();
	assert_eq!( ids( order.ids() ), [ "db", "model", "http" ]);
	assert_eq!( order.len(), 3 );

}

#[test]
fn resolution_every_import_precedes_its_importer() {

	let table = DescriptorTable::build([
		plugin( "app/ui", &[ "app/api", "core/log" ], &[ "ui" ]),
		plugin( "app/api", &[ "core/db", "core/log" ], &[ "api" ]),
		plugin( "core/db", &[ "core/log" ], &[ "db" ]),
		plugin( "core/log", &[], &[ "log" ]),
	], None ).unwrap();

	let order = resolve( table ).unwrap();
	let position = | service: &str | order.iter()
		.position(| plugin | plugin.exports().iter().any(| export | export.as_str() == service ))
		.unwrap();

	for ( index, plugin ) in order.iter().enumerate() {
		for import in plugin.imports() {
			assert!(
				position( import.service().as_str() ) < index,
				"{} was ordered before the provider of {}", plugin.id(), import.service(),
			);
		}
	}

}
