use std::time::Duration ;
use plugin_compose::{ AppBuilder, PluginConfig, ProvidedServices, factory_fn };

use crate::lifecycle_events::{ activated, channel, drain };
use crate::plugin_fixtures::plugin ;

#[tokio::test]
async fn activation_deferred_completion() {

	let ( sender, mut receiver ) = channel();

	let app = AppBuilder::new()
		.with_plugin( PluginConfig::new( "net/dns" )
			.without_imports()
			.export( "resolver" )
			.factory( factory_fn(| _, _, exports | {
				tokio::spawn( async move {
					tokio::time::sleep( Duration::from_millis( 10 )).await;
					exports.provide( ProvidedServices::new().with( "resolver", String::from( "1.1.1.1" )));
				});
				Ok(())
			})))
		.with_plugin( plugin( "net/http", &[ "net/resolver" ], &[ "client" ]))
		.with_listener( sender )
		.start().await
		.unwrap();

	assert_eq!( *app.get_as::<String>( "net/resolver" ).unwrap(), "1.1.1.1" );
	assert_eq!( activated( &drain( &mut receiver )), [ "net/dns", "net/http" ]);

}

#[tokio::test( flavor = "multi_thread", worker_threads = 2 )]
async fn activation_deferred_completion_from_another_thread() {

	let app = AppBuilder::new()
		.with_plugin( PluginConfig::new( "jobs/worker" )
			.without_imports()
			.export( "pool" )
			.factory( factory_fn(| _, _, exports | {
				std::thread::spawn( move || {
					std::thread::sleep( Duration::from_millis( 10 ));
					exports.provide( ProvidedServices::new().with( "pool", 4_usize ));
				});
				Ok(())
			})))
		.start().await
		.unwrap();

	assert_eq!( *app.get_as::<usize>( "jobs/pool" ).unwrap(), 4 );

}
