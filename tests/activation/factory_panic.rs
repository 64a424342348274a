use std::sync::Arc ;
use std::sync::atomic::{ AtomicUsize, Ordering };
use plugin_compose::{ ActivationError, AppBuilder, FactoryPanicked, FnListener, PluginConfig, StartupError, factory_fn };

use crate::lifecycle_events::{ activated, channel, drain, errors, ready_count };
use crate::plugin_fixtures::{ counting, plugin, plugin_with };

#[tokio::test]
async fn activation_factory_panic() {

	let ( sender, mut receiver ) = channel();
	let downstream = Arc::new( AtomicUsize::new( 0 ));

	let result = AppBuilder::new()
		.with_plugin( plugin( "blog/db", &[], &[ "store" ]))
		.with_plugin( PluginConfig::new( "blog/model" )
			.import( "store", "store" )
			.export( "posts" )
			.factory( factory_fn(| _, _, _ | panic!( "boom" ))))
		.with_plugin( plugin_with( "blog/web", &[ "posts" ], &[], counting( &downstream )))
		.with_listener( sender )
		.start().await;

	match result {
		Err( StartupError::Activation( ActivationError::PluginActivation { plugin, source })) => {
			assert_eq!( plugin.as_str(), "blog/model" );
			assert_eq!( source.downcast_ref::<FactoryPanicked>(), Some( &FactoryPanicked( "boom".to_string() )));
		},
		Err( err ) => panic!( "Unexpected error: {}", err ),
		Ok( _ ) => panic!( "Expected failure" ),
	}

	let events = drain( &mut receiver );
	assert_eq!( activated( &events ), [ "blog/db" ]);
	assert_eq!( ready_count( &events ), 0 );
	assert_eq!( errors( &events ).len(), 1 );
	assert_eq!( downstream.load( Ordering::SeqCst ), 0 );

}

#[tokio::test]
async fn activation_factory_panic_inside_spawned_start() {

	let error_calls = Arc::new( AtomicUsize::new( 0 ));
	let counter = Arc::clone( &error_calls );

	let joined = tokio::spawn( AppBuilder::new()
		.with_plugin( PluginConfig::new( "blog/db" )
			.without_imports()
			.export( "store" )
			.factory( factory_fn(| descriptor, _, _ | panic!( "cannot open {}", descriptor.id() ))))
		.with_listener( FnListener::new().on_error( move | _ | { counter.fetch_add( 1, Ordering::SeqCst ); }))
		.start()
	).await ;

	let result = match joined {
		Ok( result ) => result,
		Err( err ) => panic!( "Startup task panicked: {}", err ),
	};
	assert!( matches!(
		result,
		Err( StartupError::Activation( ActivationError::PluginActivation { ref source, .. }))
			if source.downcast_ref::<FactoryPanicked>().is_some_and(| panicked | panicked.0 == "cannot open blog/db" )
	));
	assert_eq!( error_calls.load( Ordering::SeqCst ), 1 );

}
