#[allow( dead_code )]
mod plugin_fixtures {

	use std::collections::HashMap ;
	use std::sync::Arc ;
	use std::sync::atomic::{ AtomicUsize, Ordering };
	use plugin_compose::{
		PluginConfig, PluginFactory, PluginId, PluginMetadata, PluginSource, ProvidedServices,
		SharedFactory, SourceError, factory_fn,
	};

	/// Provides every declared export, each holding its own qualified name as a `String`.
	pub fn provide_declared() -> SharedFactory {
		factory_fn(| descriptor, _, exports | {
			let services = descriptor.exports().iter()
				.fold( ProvidedServices::new(), | services, name | services.with( name.as_str(), name.to_string() ));
			exports.provide( services );
			Ok(())
		})
	}

	/// Like [`provide_declared`], counting how many times it was activated.
	pub fn counting( activations: &Arc<AtomicUsize> ) -> SharedFactory {
		let activations = Arc::clone( activations );
		let inner = provide_declared();
		factory_fn( move | descriptor, imports, exports | {
			activations.fetch_add( 1, Ordering::SeqCst );
			inner.activate( descriptor, imports, exports )
		})
	}

	/// A plugin whose imports are bound under the service name itself.
	pub fn plugin( id: &str, imports: &[&str], exports: &[&str] ) -> PluginConfig {
		PluginConfig::new( id )
			.imports( imports.iter().map(| name | ( *name, *name )))
			.exports( exports.iter().copied() )
			.factory( provide_declared() )
	}

	/// A plugin with the given factory instead of [`provide_declared`].
	pub fn plugin_with( id: &str, imports: &[&str], exports: &[&str], factory: SharedFactory ) -> PluginConfig {
		plugin( id, imports, exports ).factory( factory )
	}

	pub fn ids<'a>( ids: impl IntoIterator<Item = &'a PluginId> ) -> Vec<&'a str> {
		ids.into_iter().map( PluginId::as_str ).collect()
	}

	/// In-memory discovery keyed by plugin id.
	#[derive( Debug, Default )]
	pub struct MapSource( pub HashMap<String, PluginMetadata> );

	impl MapSource {
		pub fn with( mut self, id: &str, imports: &[( &str, &str )], exports: &[&str] ) -> Self {
			self.0.insert( id.to_string(), PluginMetadata {
				scope: None,
				imports: imports.iter().map(|( alias, name )| ( alias.to_string(), name.to_string() )).collect(),
				exports: exports.iter().map( ToString::to_string ).collect(),
				entry_point: id.to_string(),
				factory: provide_declared(),
			});
			self
		}
	}

	impl PluginSource for MapSource {
		fn metadata( &self, plugin: &PluginId ) -> Result<PluginMetadata, SourceError> {
			self.0.get( plugin.as_str() ).cloned().ok_or_else(|| SourceError::NotFound( plugin.clone() ))
		}
	}

}
