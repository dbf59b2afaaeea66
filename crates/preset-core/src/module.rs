//! Contributor modules and their classified shapes.
//!
//! A loaded module is classified once, right after loading, into
//! [`ContributorModule`]; everything downstream branches on that tag.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use serde_json::Value;

use crate::declaration::{PresetDeclaration, kind_of};
use crate::error::{Error, Result};
use crate::options::CombinedOptions;

/// Key of the sub-preset list in a contributor document.
pub const PRESETS_KEY: &str = "presets";

/// Key of the addon list in a contributor document.
pub const ADDONS_KEY: &str = "addons";

/// What a reducer receives besides the accumulated value.
#[derive(Debug, Clone)]
pub struct ReducerContext {
    /// Session options, call arguments, the preset's own options and the
    /// re-entrant presets handle
    pub options: CombinedOptions,
    /// The contributor body the reducer belongs to
    pub body: Arc<ContributorBody>,
}

type ReducerFn = dyn Fn(Value, ReducerContext) -> BoxFuture<'static, Result<Value>> + Send + Sync;

/// An async function folding the accumulated value of an extension point.
#[derive(Clone)]
pub struct Reducer(Arc<ReducerFn>);

impl Reducer {
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(Value, ReducerContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        Self(Arc::new(move |value, context| f(value, context).boxed()))
    }

    /// Wrap a synchronous reducer.
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn(Value, &ReducerContext) -> Result<Value> + Send + Sync + 'static,
    {
        Self::new(move |value, context| futures::future::ready(f(value, &context)))
    }

    pub(crate) fn call(&self, value: Value, context: ReducerContext) -> BoxFuture<'static, Result<Value>> {
        (self.0)(value, context)
    }
}

impl std::fmt::Debug for Reducer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Reducer(..)")
    }
}

/// One extension point definition.
#[derive(Debug, Clone)]
pub enum Contribution {
    /// Merged into the accumulated value
    Value(Value),
    /// Called with the accumulated value
    Reducer(Reducer),
}

/// A preset's own extension point definitions, with `presets`/`addons` split out.
#[derive(Debug, Clone, Default)]
pub struct ContributorBody {
    entries: BTreeMap<String, Contribution>,
}

impl ContributorBody {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define (or redefine) an extension point.
    pub fn insert(&mut self, extension: impl Into<String>, contribution: Contribution) {
        self.entries.insert(extension.into(), contribution);
    }

    pub fn get(&self, extension: &str) -> Option<&Contribution> {
        self.entries.get(extension)
    }

    /// The plain value of an extension point, if it is not a reducer.
    pub fn value(&self, extension: &str) -> Option<&Value> {
        match self.entries.get(extension) {
            Some(Contribution::Value(value)) => Some(value),
            _ => None,
        }
    }

    pub fn contains(&self, extension: &str) -> bool {
        self.entries.contains_key(extension)
    }

    /// Names of the extension points this body defines, sorted.
    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

type DeclarationFactoryFn = dyn Fn(&CombinedOptions) -> Result<Vec<PresetDeclaration>> + Send + Sync;

/// A `presets` or `addons` field: a list, or a function producing one.
#[derive(Clone)]
pub enum DeclarationSource {
    List(Vec<PresetDeclaration>),
    Factory(Arc<DeclarationFactoryFn>),
}

impl DeclarationSource {
    pub fn factory<F>(f: F) -> Self
    where
        F: Fn(&CombinedOptions) -> Result<Vec<PresetDeclaration>> + Send + Sync + 'static,
    {
        Self::Factory(Arc::new(f))
    }

    /// Produce the declaration list, invoking the factory if there is one.
    pub fn resolve(&self, options: &CombinedOptions) -> Result<Vec<PresetDeclaration>> {
        match self {
            Self::List(list) => Ok(list.clone()),
            Self::Factory(f) => f(options),
        }
    }
}

impl std::fmt::Debug for DeclarationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::List(list) => f.debug_tuple("List").field(list).finish(),
            Self::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

/// The mapping form of a contributor module.
#[derive(Debug, Clone, Default)]
pub struct ModuleContents {
    pub presets: Option<DeclarationSource>,
    pub addons: Option<DeclarationSource>,
    pub body: ContributorBody,
}

impl ModuleContents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sub-preset declaration.
    ///
    /// Replaces a previously set presets factory.
    pub fn preset(mut self, declaration: impl Into<PresetDeclaration>) -> Self {
        push_declaration(&mut self.presets, declaration.into());
        self
    }

    /// Compute the sub-preset list at load time.
    pub fn presets_factory<F>(mut self, f: F) -> Self
    where
        F: Fn(&CombinedOptions) -> Result<Vec<PresetDeclaration>> + Send + Sync + 'static,
    {
        self.presets = Some(DeclarationSource::factory(f));
        self
    }

    /// Append an addon declaration.
    ///
    /// Replaces a previously set addons factory.
    pub fn addon(mut self, declaration: impl Into<PresetDeclaration>) -> Self {
        push_declaration(&mut self.addons, declaration.into());
        self
    }

    /// Compute the addon list at load time.
    pub fn addons_factory<F>(mut self, f: F) -> Self
    where
        F: Fn(&CombinedOptions) -> Result<Vec<PresetDeclaration>> + Send + Sync + 'static,
    {
        self.addons = Some(DeclarationSource::factory(f));
        self
    }

    /// Contribute a plain value to an extension point.
    pub fn value(mut self, extension: impl Into<String>, value: Value) -> Self {
        self.body.insert(extension, Contribution::Value(value));
        self
    }

    /// Contribute an async reducer to an extension point.
    pub fn reducer<F, Fut>(mut self, extension: impl Into<String>, f: F) -> Self
    where
        F: Fn(Value, ReducerContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        self.body.insert(extension, Contribution::Reducer(Reducer::new(f)));
        self
    }

    /// Contribute a synchronous reducer to an extension point.
    pub fn sync_reducer<F>(mut self, extension: impl Into<String>, f: F) -> Self
    where
        F: Fn(Value, &ReducerContext) -> Result<Value> + Send + Sync + 'static,
    {
        self.body.insert(extension, Contribution::Reducer(Reducer::sync(f)));
        self
    }
}

fn push_declaration(slot: &mut Option<DeclarationSource>, declaration: PresetDeclaration) {
    match slot {
        Some(DeclarationSource::List(list)) => list.push(declaration),
        _ => *slot = Some(DeclarationSource::List(vec![declaration])),
    }
}

/// What a module factory produces.
#[derive(Debug, Clone)]
pub enum Expanded {
    Contents(ModuleContents),
    Alias(Vec<PresetDeclaration>),
}

type ModuleFactoryFn = dyn Fn(&CombinedOptions) -> Result<Expanded> + Send + Sync;

/// A module exported as a function of the combined options.
#[derive(Clone)]
pub struct ModuleFactory(Arc<ModuleFactoryFn>);

impl ModuleFactory {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&CombinedOptions) -> Result<Expanded> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, options: &CombinedOptions) -> Result<Expanded> {
        (self.0)(options)
    }
}

impl std::fmt::Debug for ModuleFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ModuleFactory(..)")
    }
}

/// A loaded module, classified by shape.
#[derive(Debug, Clone)]
pub enum ContributorModule {
    /// A mapping of extension points (plus `presets`/`addons`)
    Value(ModuleContents),
    /// A function returning the real contents
    Factory(ModuleFactory),
    /// A pure alias for a list of further declarations
    ArrayAlias(Vec<PresetDeclaration>),
}

impl ContributorModule {
    /// Shorthand for a factory module.
    pub fn factory<F>(f: F) -> Self
    where
        F: Fn(&CombinedOptions) -> Result<Expanded> + Send + Sync + 'static,
    {
        Self::Factory(ModuleFactory::new(f))
    }

    /// Classify a declarative document.
    ///
    /// A top-level array is an alias; a table contributes every key except
    /// `presets` and `addons` as a plain value.
    pub fn from_document(specifier: &str, document: Value) -> Result<Self> {
        let invalid = |reason: String| Error::InvalidModule {
            specifier: specifier.to_string(),
            reason,
        };

        match document {
            Value::Array(_) => {
                let list = PresetDeclaration::list_from_value(document)
                    .map_err(|e| invalid(e.to_string()))?;
                Ok(Self::ArrayAlias(list))
            }
            Value::Object(table) => {
                let mut contents = ModuleContents::new();
                for (key, value) in table {
                    match key.as_str() {
                        PRESETS_KEY | ADDONS_KEY => {
                            let list = PresetDeclaration::list_from_value(value)
                                .map_err(|e| invalid(format!("`{key}`: {e}")))?;
                            let source = Some(DeclarationSource::List(list));
                            if key == PRESETS_KEY {
                                contents.presets = source;
                            } else {
                                contents.addons = source;
                            }
                        }
                        _ => contents.body.insert(key, Contribution::Value(value)),
                    }
                }
                Ok(Self::Value(contents))
            }
            other => Err(invalid(format!(
                "expected a table or an array, found {}",
                kind_of(&other)
            ))),
        }
    }

    /// Rewrite every statically known declaration name.
    ///
    /// Factories are left untouched; their output is only known at load time.
    pub fn map_declaration_names(self, f: impl Fn(&str) -> Option<String>) -> Self {
        let rename = |list: Vec<PresetDeclaration>| -> Vec<PresetDeclaration> {
            list.into_iter()
                .map(|decl| match f(decl.name()) {
                    Some(name) => decl.renamed(name),
                    None => decl,
                })
                .collect()
        };
        let rename_source = |source: Option<DeclarationSource>| match source {
            Some(DeclarationSource::List(list)) => Some(DeclarationSource::List(rename(list))),
            other => other,
        };

        match self {
            Self::ArrayAlias(list) => Self::ArrayAlias(rename(list)),
            Self::Value(contents) => Self::Value(ModuleContents {
                presets: rename_source(contents.presets),
                addons: rename_source(contents.addons),
                body: contents.body,
            }),
            factory @ Self::Factory(_) => factory,
        }
    }
}

impl From<ModuleContents> for ContributorModule {
    fn from(contents: ModuleContents) -> Self {
        Self::Value(contents)
    }
}
