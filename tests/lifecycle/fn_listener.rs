use std::sync::{ Arc, Mutex };
use std::sync::atomic::{ AtomicUsize, Ordering };
use plugin_compose::{ AppBuilder, FnListener };

use crate::plugin_fixtures::plugin ;

#[tokio::test]
async fn lifecycle_fn_listener() {

	let activated = Arc::new( Mutex::new( Vec::new() ));
	let ready = Arc::new( AtomicUsize::new( 0 ));
	let failed = Arc::new( AtomicUsize::new( 0 ));

	let listener = {
		let ( activated, ready, failed ) = ( Arc::clone( &activated ), Arc::clone( &ready ), Arc::clone( &failed ));
		FnListener::new()
			.on_plugin_activated( move | plugin | activated.lock().unwrap().push( plugin.to_string() ))
			.on_ready( move | registry | { ready.fetch_add( registry.len(), Ordering::SeqCst ); })
			.on_error( move | _ | { failed.fetch_add( 1, Ordering::SeqCst ); })
	};

	AppBuilder::new()
		.with_plugin( plugin( "b", &[ "a/x" ], &[ "y" ]))
		.with_plugin( plugin( "a", &[], &[ "x" ]))
		.with_listener( listener )
		.start().await
		.unwrap();

	assert_eq!( *activated.lock().unwrap(), [ "a", "b" ]);
	assert_eq!( ready.load( Ordering::SeqCst ), 2 );
	assert_eq!( failed.load( Ordering::SeqCst ), 0 );

}

#[tokio::test]
async fn lifecycle_partial_listener() {

	let ready = Arc::new( AtomicUsize::new( 0 ));
	let counter = Arc::clone( &ready );

	AppBuilder::new()
		.with_plugin( plugin( "a", &[], &[ "x" ]))
		.with_listener( FnListener::new().on_ready( move | _ | { counter.fetch_add( 1, Ordering::SeqCst ); }))
		.start().await
		.unwrap();

	assert_eq!( ready.load( Ordering::SeqCst ), 1 );

}
