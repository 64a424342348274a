//! Load order computation.
//!
//! Plugins are ordered by an iterative fixed point rather than a graph
//! traversal. Each round walks the still pending plugins in configuration
//! order and places every plugin whose imports have all been credited. A
//! placed plugin credits its exports immediately, so a plugin later in the
//! same round may already rely on them. Rounds repeat until everything is
//! placed or a round places nothing.
//!
//! The result is deterministic: for the same table the order is always the
//! same, and plugins that become ready together keep their configuration order.

use std::collections::{ HashSet, VecDeque };
use itertools::{ Either, Itertools };
use pipe_trait::Pipe ;
use thiserror::Error ;

use crate::descriptor::{ DescriptorTable, PluginDescriptor, ServiceImport };
use crate::plugin_id::PluginId ;
use crate::service_name::QualifiedServiceName ;



/// A missing import of a plugin that could not be placed.
#[derive( Debug, Clone, PartialEq, Eq )]
pub struct UnresolvedImport {
	/// The plugin that is stuck.
	pub plugin: PluginId,
	/// The service it is still waiting for.
	pub service: QualifiedServiceName,
}

impl std::fmt::Display for UnresolvedImport {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		write!( f, "{} -> {}", self.plugin, self.service )
	}
}

/// Some plugins can never be activated because their imports are never provided.
///
/// Missing imports are split into two groups:
/// - `cyclic`: some *other* stuck plugin exports the service, so the plugins
/// 	are waiting on each other;
/// - `absent`: no other stuck plugin exports it, so nobody ever will. A plugin
/// 	importing its own export ends up here.
///
/// The split only looks at who exports what among the stuck plugins. It is a
/// hint for the reader, not a proof that a cycle exists.
#[derive( Debug, Clone, PartialEq, Eq, Error )]
#[error(
	"Could not resolve all dependencies of plugins [{}]; waiting on each other: [{}]; provided by nobody: [{}]",
	.plugins.iter().join( ", " ),
	.cyclic.iter().join( ", " ),
	.absent.iter().join( ", " ),
)]
pub struct UnresolvedDependencyError {
	/// Every plugin left pending, in configuration order.
	pub plugins: Vec<PluginId>,
	/// Imports exported by another pending plugin.
	pub cyclic: Vec<UnresolvedImport>,
	/// Imports no other pending plugin exports.
	pub absent: Vec<UnresolvedImport>,
}

impl UnresolvedDependencyError {

	/// Distinct service names under `cyclic`.
	pub fn cyclic_services( &self ) -> Vec<&QualifiedServiceName> {
		self.cyclic.iter().map(| import | &import.service ).unique().collect()
	}

	/// Distinct service names under `absent`.
	pub fn absent_services( &self ) -> Vec<&QualifiedServiceName> {
		self.absent.iter().map(| import | &import.service ).unique().collect()
	}

}

/// Plugins in the order they must be activated.
#[derive( Debug, Clone )]
pub struct LoadOrder {
	plugins: Vec<PluginDescriptor>,
}

impl LoadOrder {

	pub fn iter( &self ) -> impl Iterator<Item = &PluginDescriptor> { self.plugins.iter() }

	/// Plugin ids in activation order.
	pub fn ids( &self ) -> impl Iterator<Item = &PluginId> { self.plugins.iter().map( PluginDescriptor::id ) }

	#[inline] pub fn len( &self ) -> usize { self.plugins.len() }
	#[inline] pub fn is_empty( &self ) -> bool { self.plugins.is_empty() }

	pub(crate) fn into_queue( self ) -> VecDeque<PluginDescriptor> { self.plugins.into() }

}

/// Working copy of a plugin that has not been placed yet.
struct PendingPlugin {
	descriptor: PluginDescriptor,
	missing: Vec<ServiceImport>,
}

impl From<PluginDescriptor> for PendingPlugin {
	fn from( descriptor: PluginDescriptor ) -> Self {
		let missing = descriptor.imports().to_vec();
		Self { descriptor, missing }
	}
}

/// Orders `table` so that every plugin comes after the providers of all its imports.
///
/// ```
/// use plugin_compose::{ DescriptorTable, PluginConfig, factory_fn, resolve };
///
/// let noop = factory_fn(| _, _, exports | { exports.provide( Default::default() ); Ok(()) });
/// let table = DescriptorTable::build([
/// 	PluginConfig::new( "http" ).import( "model", "model/post" ).export( "server" ).factory( noop.clone() ),
/// 	PluginConfig::new( "db" ).without_imports().export( "store" ).factory( noop.clone() ),
/// 	PluginConfig::new( "model" ).import( "db", "db/store" ).export( "post" ).factory( noop ),
/// ], None ).unwrap();
///
/// let order = resolve( table ).unwrap();
/// assert_eq!( order.ids().map(| id | id.as_str() ).collect::<Vec<_>>(), [ "db", "model", "http" ]);
/// ```
///
/// # Errors
/// Returns [`UnresolvedDependencyError`] if any plugin can not be placed.
pub fn resolve( table: DescriptorTable ) -> Result<LoadOrder, UnresolvedDependencyError> {

	let mut pending = table.into_iter().map( PendingPlugin::from ).collect::<Vec<_>>();
	let mut resolved_names = HashSet::<QualifiedServiceName>::new();
	let mut ordered = Vec::with_capacity( pending.len() );
	let mut round = 0_usize ;

	while !pending.is_empty() {

		round += 1 ;
		let placed_before = ordered.len();

		pending = pending.into_iter().filter_map(| mut plugin | {
			plugin.missing.retain(| import | !resolved_names.contains( import.service() ));
			match plugin.missing.is_empty() {
				true => {
					resolved_names.extend( plugin.descriptor.exports().iter().cloned() );
					ordered.push( plugin.descriptor );
					None
				},
				false => Some( plugin ),
			}
		}).collect();

		let placed = ordered.len() - placed_before ;
		tracing::debug!( round, placed, pending = pending.len(), "Dependency resolution round" );
		if placed == 0 { break }

	}

	if pending.is_empty() {
		tracing::debug!( order = %ordered.iter().map( PluginDescriptor::id ).join( ", " ), "Resolved load order" );
		return Ok( LoadOrder { plugins: ordered })
	}

	let error = diagnose( &pending );
	tracing::error!(
		plugins = %error.plugins.iter().join( ", " ),
		resolved = %resolved_names.iter().sorted().join( ", " ),
		cyclic = %error.cyclic.iter().join( ", " ),
		absent = %error.absent.iter().join( ", " ),
		"Could not resolve plugin dependencies"
	);
	Err( error )

}

fn diagnose( pending: &[PendingPlugin] ) -> UnresolvedDependencyError {

	let exported_by_other = | plugin: &PendingPlugin, service: &QualifiedServiceName | pending.iter()
		.filter(| other | !std::ptr::eq( *other, plugin ))
		.any(| other | other.descriptor.exports().contains( service ));

	let ( cyclic, absent ): ( Vec<_>, Vec<_> ) = pending.iter()
		.flat_map(| plugin | plugin.missing.iter().map( move | import | ( plugin, import )))
		.partition_map(|( plugin, import )| {
			let unresolved = UnresolvedImport { plugin: plugin.descriptor.id().clone(), service: import.service().clone() };
			match exported_by_other( plugin, import.service() ) {
				true => Either::Left( unresolved ),
				false => Either::Right( unresolved ),
			}
		});

	pending.iter()
		.map(| plugin | plugin.descriptor.id().clone() )
		.collect::<Vec<_>>()
		.pipe(| plugins | UnresolvedDependencyError { plugins, cyclic, absent })

}
