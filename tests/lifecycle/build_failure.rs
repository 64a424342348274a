use std::sync::Arc ;
use std::sync::atomic::{ AtomicUsize, Ordering };
use plugin_compose::{ AppBuilder, StartupError };

use crate::lifecycle_events::{ activated, channel, drain, errors, ready_count };
use crate::plugin_fixtures::{ counting, plugin_with };

#[tokio::test]
async fn lifecycle_unresolved_dependencies_are_reported() {

	let ( sender, mut receiver ) = channel();
	let activations = Arc::new( AtomicUsize::new( 0 ));

	let result = AppBuilder::new()
		.with_plugin( plugin_with( "a", &[ "b/x" ], &[ "y" ], counting( &activations )))
		.with_plugin( plugin_with( "b", &[ "a/y" ], &[ "x" ], counting( &activations )))
		.with_listener( sender )
		.start().await;

	match result {
		Err( StartupError::UnresolvedDependency( err )) => assert_eq!( err.cyclic.len(), 2 ),
		Err( err ) => panic!( "Unexpected error: {}", err ),
		Ok( _ ) => panic!( "Expected failure" ),
	}

	assert_eq!( activations.load( Ordering::SeqCst ), 0 );
	let events = drain( &mut receiver );
	assert!( activated( &events ).is_empty() );
	assert_eq!( ready_count( &events ), 0 );
	let errors = errors( &events );
	assert_eq!( errors.len(), 1 );
	assert!( errors[ 0 ].contains( "a -> b/x" ), "{}", errors[ 0 ]);

}

#[test]
fn lifecycle_build_reports_before_anything_runs() {

	let ( sender, mut receiver ) = channel();
	assert!( AppBuilder::new().with_listener( sender ).build().is_err() );
	assert_eq!( errors( &drain( &mut receiver )).len(), 1 );

}
