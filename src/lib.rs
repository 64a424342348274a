//! Assembles applications out of plugins that depend on each other's services.
//!
//! Each plugin declares the services it **imports** and the services it
//! **exports**. `plugin_compose` validates those declarations, works out an
//! order in which every plugin comes after the providers of its imports, and
//! then activates the plugins one by one, collecting what they export into a
//! shared [`ServiceRegistry`].
//!
//! # Core Concepts
//!
//! - [`QualifiedServiceName`]: A service key of the form `scope/local-name`. Plugins
//! 	may leave out the scope of their own services; names are qualified against the
//! 	plugin's scope before anything is matched.
//!
//! - [`PluginConfig`]: One configured plugin, either a bare id or a detailed entry with
//! 	imports, exports, a factory and free-form options. Deserializable with `serde`.
//!
//! - [`PluginSource`]: Fills in plugins configured without a factory. [`FileSystemSource`]
//! 	reads `manifest.toml` files and maps their entry points through a [`FactoryCatalog`].
//!
//! - [`DescriptorTable`]: The validated, non-empty list of [`PluginDescriptor`]s.
//!
//! - [`resolve`]: Computes the [`LoadOrder`], or explains which imports can never be
//! 	satisfied through an [`UnresolvedDependencyError`].
//!
//! - [`PluginFactory`]: The code of a plugin. It receives its [`Imports`] and answers
//! 	exactly once through an [`ExportHandle`], right away or from another task.
//!
//! - [`LifecycleListener`]: Notified when a plugin comes up, when every plugin is
//! 	ready, and when startup fails.
//!
//! # Example
//!
//! ```
//! use plugin_compose::{ AppBuilder, PluginConfig, ProvidedServices, factory_fn };
//!
//! struct Store { url: String }
//! struct Posts { store: std::sync::Arc<Store> }
//!
//! # #[tokio::main( flavor = "current_thread" )]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let app = AppBuilder::new()
//! 	// Configuration order does not matter; `model` still starts after `db`.
//! 	.with_plugin( PluginConfig::new( "blog/model" )
//! 		.import( "store", "db" )
//! 		.export( "posts" )
//! 		.factory( factory_fn(| _, imports, exports | {
//! 			let store = imports.get_as::<Store>( "store" ).ok_or( "store missing" )?;
//! 			exports.provide( ProvidedServices::new().with( "posts", Posts { store }));
//! 			Ok(())
//! 		})))
//! 	.with_plugin( PluginConfig::new( "blog/db" )
//! 		.without_imports()
//! 		.export( "db" )
//! 		.option( "url", "sqlite::memory:" )
//! 		.factory( factory_fn(| descriptor, _, exports | {
//! 			let url = descriptor.options()[ "url" ].as_str().unwrap_or_default().to_string();
//! 			// Answering later, e.g. from a spawned task, works the same way.
//! 			exports.provide( ProvidedServices::new().with( "db", Store { url }));
//! 			Ok(())
//! 		})))
//! 	.start().await?;
//!
//! let ids = app.load_order().iter().map(| id | id.as_str() ).collect::<Vec<_>>();
//! assert_eq!( ids, [ "blog/db", "blog/model" ]);
//! assert_eq!( app.get_as::<Posts>( "blog/posts" ).unwrap().store.url, "sqlite::memory:" );
//! # Ok(())
//! # }
//! ```
//!
//! # Failure
//!
//! Every phase is fail-fast and nothing is retried. Configuration and ordering
//! errors surface from [`AppBuilder::build`]; activation errors from
//! [`PreparedApp::start`]. Either way listeners receive the same [`StartupError`]
//! through [`LifecycleListener::on_error`], and plugins queued after a failing
//! one are never activated.

mod app ;
mod config ;
mod descriptor ;
mod engine ;
mod factory ;
mod lifecycle ;
mod plugin_id ;
mod registry ;
mod resolver ;
mod service_name ;
mod source ;

pub use app::{ App, AppBuilder, PreparedApp, StartupError };
pub use config::{ PluginConfig, DetailedPluginConfig };
pub use descriptor::{ DescriptorError, DescriptorField, DescriptorTable, PluginDescriptor, ServiceImport };
pub use engine::{ ActivationError, ExportHandleDropped, FactoryPanicked };
pub use factory::{ BoxError, ExportHandle, Imports, PluginFactory, ProvidedServices, Service, SharedFactory, factory_fn };
pub use lifecycle::{ FnListener, LifecycleEvent, LifecycleListener };
pub use plugin_id::{ PluginId, PluginIdError };
pub use registry::{ DuplicateServiceError, ServiceRegistry };
pub use resolver::{ LoadOrder, UnresolvedDependencyError, UnresolvedImport, resolve };
pub use service_name::{ QualifiedServiceName, ServiceNameError, SCOPE_SEPARATOR };
pub use source::{ FactoryCatalog, FileSystemSource, PluginMetadata, PluginSource, SourceError };
