//! Validated plugin descriptors.
//!
//! A [`DescriptorTable`] is built from the configured [`PluginConfig`] entries.
//! Entries without a factory are completed from a [`PluginSource`]; explicitly
//! configured fields always win over discovered ones. Every declared service
//! name is qualified against the plugin's scope here, so nothing downstream
//! ever sees a raw name.

use itertools::Itertools ;
use nonempty_collections::NEVec ;
use serde_json::{ Map, Value };
use thiserror::Error ;

use crate::config::PluginConfig ;
use crate::factory::SharedFactory ;
use crate::plugin_id::{ PluginId, PluginIdError };
use crate::service_name::{ QualifiedServiceName, ServiceNameError };
use crate::source::{ PluginSource, SourceError };



/// The part of a descriptor that was still missing after discovery.
#[derive( Debug, Clone, Copy, PartialEq, Eq )]
pub enum DescriptorField { Factory, Imports, Exports }

impl std::fmt::Display for DescriptorField {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.write_str( match self {
			Self::Factory => "factory",
			Self::Imports => "imports",
			Self::Exports => "exports",
		})
	}
}

/// Errors while turning configuration into a [`DescriptorTable`].
///
/// Construction is fail-fast: the first error aborts the whole table.
#[derive( Debug, Error )]
pub enum DescriptorError {
	/// The configuration lists no plugins at all.
	#[error( "No plugins configured: an application needs at least one plugin to do anything" )]
	NoPluginsConfigured,
	/// A configured plugin id is malformed.
	#[error( "{0}" )]
	InvalidPluginName( #[from] PluginIdError ),
	/// A declared import or export name is malformed.
	#[error( "Plugin {plugin} declares an invalid service name: {source}" )]
	InvalidServiceName { plugin: PluginId, source: ServiceNameError },
	/// Two imports of one plugin share an alias but name different services.
	#[error( "Plugin {plugin} imports more than one service under the alias '{alias}'" )]
	DuplicateImportAlias { plugin: PluginId, alias: String },
	/// The descriptor lacks a required field even after discovery.
	#[error( "Plugin {plugin} is missing its {field}" )]
	IncompletePluginDescriptor { plugin: PluginId, field: DescriptorField },
	/// Discovery failed for a plugin configured without a factory.
	#[error( "Plugin discovery failed: {0}" )]
	PluginSource( #[from] SourceError ),
}

/// One import of a plugin: the service it needs and the alias it receives it under.
#[derive( Debug, Clone, PartialEq, Eq, Hash )]
pub struct ServiceImport {
	alias: String,
	service: QualifiedServiceName,
}

impl ServiceImport {
	pub fn new( alias: impl Into<String>, service: QualifiedServiceName ) -> Self {
		Self { alias: alias.into(), service }
	}
	/// Key under which the plugin sees the service.
	#[inline] pub fn alias( &self ) -> &str { &self.alias }
	/// The service that must be registered before the plugin can activate.
	#[inline] pub fn service( &self ) -> &QualifiedServiceName { &self.service }
}

/// A fully populated, validated plugin.
///
/// Immutable once built. Cloning is cheap apart from the name lists; the factory is shared.
#[derive( Clone )]
pub struct PluginDescriptor {
	id: PluginId,
	scope: String,
	imports: Vec<ServiceImport>,
	exports: Vec<QualifiedServiceName>,
	options: Map<String, Value>,
	factory: SharedFactory,
}

impl PluginDescriptor {

	#[inline] pub fn id( &self ) -> &PluginId { &self.id }

	/// Scope the plugin's unqualified names were resolved against.
	#[inline] pub fn scope( &self ) -> &str { &self.scope }

	/// Imports in declaration order.
	#[inline] pub fn imports( &self ) -> &[ServiceImport] { &self.imports }

	/// Exports in declaration order, without duplicates.
	#[inline] pub fn exports( &self ) -> &[QualifiedServiceName] { &self.exports }

	/// Free-form options from the configuration entry.
	#[inline] pub fn options( &self ) -> &Map<String, Value> { &self.options }

	/// Deserializes the options into a typed configuration struct.
	///
	/// # Errors
	/// Fails if the options do not match `T`.
	pub fn options_as<T: serde::de::DeserializeOwned>( &self ) -> Result<T, serde_json::Error> {
		serde_json::from_value( Value::Object( self.options.clone() ))
	}

	#[inline] pub(crate) fn factory( &self ) -> &SharedFactory { &self.factory }

	fn from_config( config: PluginConfig, source: Option<&dyn PluginSource> ) -> Result<Self, DescriptorError> {

		let mut config = config.into_detailed();
		let id = PluginId::new( std::mem::take( &mut config.id ))?;

		let source = source.filter(| _ | config.factory.is_none() );
		if let Some( source ) = source {
			let metadata = source.metadata( &id )?;
			tracing::debug!( plugin = %id, entry_point = %metadata.entry_point, "Discovered plugin metadata" );
			config.scope = config.scope.or( metadata.scope );
			config.imports = config.imports.or( Some( metadata.imports ));
			config.exports = config.exports.or( Some( metadata.exports ));
			config.factory = Some( metadata.factory );
		}

		let incomplete = | field | DescriptorError::IncompletePluginDescriptor { plugin: id.clone(), field };
		let factory = config.factory.ok_or_else(|| incomplete( DescriptorField::Factory ))?;
		let exports = config.exports.ok_or_else(|| incomplete( DescriptorField::Exports ))?;
		let imports = config.imports.ok_or_else(|| incomplete( DescriptorField::Imports ))?;

		let scope = config.scope.unwrap_or_else(|| id.scope().to_string() );
		let qualify = | name: &str | QualifiedServiceName::resolve( &scope, name )
			.map_err(| source | DescriptorError::InvalidServiceName { plugin: id.clone(), source });

		let imports = imports.into_iter()
			.map(|( alias, name )| Ok( ServiceImport::new( alias, qualify( &name )? )))
			.collect::<Result<Vec<_>, DescriptorError>>()?
			.into_iter()
			.unique()
			.collect::<Vec<_>>();
		if let Some( alias ) = imports.iter().map( ServiceImport::alias ).duplicates().next() {
			return Err( DescriptorError::DuplicateImportAlias { plugin: id.clone(), alias: alias.to_string() })
		}

		let exports = exports.iter()
			.map(| name | qualify( name ))
			.collect::<Result<Vec<_>, _>>()?
			.into_iter()
			.unique()
			.collect();

		Ok( Self { id, scope, imports, exports, options: config.options, factory })

	}

}

impl std::fmt::Debug for PluginDescriptor {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "PluginDescriptor" )
			.field( "id", &self.id )
			.field( "scope", &self.scope )
			.field( "imports", &self.imports )
			.field( "exports", &self.exports )
			.field( "options", &self.options )
			.finish_non_exhaustive()
	}
}

/// The non-empty, validated list of plugins to load, in configuration order.
#[derive( Debug, Clone )]
pub struct DescriptorTable {
	descriptors: NEVec<PluginDescriptor>,
}

impl DescriptorTable {

	/// Validates `configs` into a table.
	///
	/// Plugins configured without a factory are looked up in `source`.
	///
	/// # Errors
	/// - [`DescriptorError::NoPluginsConfigured`] if `configs` is empty
	/// - any other [`DescriptorError`] for the first entry that fails
	pub fn build(
		configs: impl IntoIterator<Item = PluginConfig>,
		source: Option<&dyn PluginSource>,
	) -> Result<Self, DescriptorError> {
		let descriptors = configs.into_iter()
			.map(| config | PluginDescriptor::from_config( config, source ))
			.collect::<Result<Vec<_>, _>>()?;
		NEVec::try_from_vec( descriptors )
			.map(| descriptors | Self { descriptors })
			.ok_or( DescriptorError::NoPluginsConfigured )
	}

	/// Descriptors in configuration order.
	pub fn iter( &self ) -> impl Iterator<Item = &PluginDescriptor> {
		IntoIterator::into_iter( self.descriptors.iter() )
	}

	/// The first configured plugin; a table is never empty.
	pub fn first( &self ) -> &PluginDescriptor { self.descriptors.first() }

}

impl IntoIterator for DescriptorTable {
	type Item = PluginDescriptor ;
	type IntoIter = std::vec::IntoIter<PluginDescriptor> ;
	fn into_iter( self ) -> Self::IntoIter {
		IntoIterator::into_iter( self.descriptors ).collect::<Vec<_>>().into_iter()
	}
}
