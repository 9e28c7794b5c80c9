use crate::{
    compile::{Node, Parser, Template},
    context::Context,
    error::{Error, ParseError, RenderError},
    filter::{builtin as builtin_filters, Filter, Filters},
    render::Renderer,
    syntax::{Builder, Syntax},
    tag::{builtin as builtin_tags, Tag, Tags},
};
use lru::LruCache;
use morel::Finder;
use std::{
    num::NonZeroUsize,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use tracing::debug;

/// Number of compiled templates an [`Engine`] keeps by default.
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

type Cache = Mutex<LruCache<String, Arc<Template>>>;

/// Facilitates compiling and rendering templates, and provides storage
/// for filters and tags.
///
/// Each `Engine` owns its own registries, so filters and tags registered with
/// one are never visible to another.
pub struct Engine {
    /// Compiled markers used to find expressions and tags.
    finder: Finder,
    /// Filters that this engine is aware of.
    filters: Filters,
    /// Tags that this engine is aware of.
    tags: Tags,
    /// Recently compiled templates, by source text.
    cache: Option<Cache>,
}

impl Engine {
    /// Create a new instance of [`Engine`] with the built-in filters and tags,
    /// and the default markers.
    ///
    /// # Examples
    ///
    /// ```
    /// use quill::{Context, Engine};
    ///
    /// let engine = Engine::new();
    /// let result = engine.render("{{ name | upcase }}", &Context::new().with_must("name", "taylor"));
    ///
    /// assert_eq!(result.unwrap(), "TAYLOR");
    /// ```
    #[inline]
    pub fn new() -> Self {
        EngineBuilder::new().build()
    }

    /// Create a new instance of [`Engine`] without any filters or tags.
    ///
    /// # Examples
    ///
    /// ```
    /// use quill::{Context, Engine};
    ///
    /// let engine = Engine::empty();
    /// assert!(engine.render("{{ name | upcase }}", &Context::new()).is_err());
    /// ```
    #[inline]
    pub fn empty() -> Self {
        EngineBuilder::new().without_builtins().build()
    }

    /// Parse the text into a tree of [`Node`] instances, without caching.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when the text contains invalid syntax.
    pub fn parse(&self, text: &str) -> Result<Vec<Node>, ParseError> {
        Parser::new(text, &self.finder, &self.tags).parse()
    }

    /// Compile a new [`Template`].
    ///
    /// Compiling the same text again returns the cached `Template` while it
    /// remains in the cache.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when compilation fails, which most likely means
    /// the source contains invalid syntax.
    ///
    /// # Examples
    ///
    /// ```
    /// use quill::Engine;
    ///
    /// let engine = Engine::new();
    /// let template = engine.compile("hello, {{ name }}!");
    /// assert!(template.is_ok());
    /// ```
    pub fn compile(&self, text: &str) -> Result<Arc<Template>, ParseError> {
        if let Some(cache) = &self.cache {
            if let Some(template) = lock(cache).get(text) {
                debug!(length = text.len(), "compile cache hit");
                return Ok(Arc::clone(template));
            }
        }
        debug!(length = text.len(), "compile cache miss");

        let template = Arc::new(Template::new(self.parse(text)?));
        if let Some(cache) = &self.cache {
            lock(cache).put(text.to_owned(), Arc::clone(&template));
        }

        Ok(template)
    }

    /// Compile the text and render it with the given [`Context`].
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if compilation fails, or if rendering fails, which may
    /// happen when a [`Filter`] or [`Tag`] returns an error itself, or the
    /// template cannot be rendered for a reason that will be described by the
    /// error.
    ///
    /// # Examples
    ///
    /// ```
    /// use quill::{Context, Engine};
    ///
    /// let engine = Engine::new();
    /// let result = engine.render("hello, {{ name }}!", &Context::new().with_must("name", "taylor"));
    ///
    /// assert_eq!(result.unwrap(), "hello, taylor!")
    /// ```
    pub fn render(&self, text: &str, context: &Context<'_>) -> Result<String, Error> {
        let template = self.compile(text)?;

        Ok(self.render_compiled(&template, context)?)
    }

    /// Render a compiled [`Template`] with the given [`Context`].
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] if rendering fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use quill::{Context, Engine};
    ///
    /// let engine = Engine::new();
    /// let template = engine.compile("hello, {{ name }}!").unwrap();
    ///
    /// for name in ["taylor", "jordan"] {
    ///     let context = Context::new().with_must("name", name);
    ///     let result = engine.render_compiled(&template, &context);
    ///     assert_eq!(result.unwrap(), format!("hello, {name}!"));
    /// }
    /// ```
    #[inline]
    pub fn render_compiled(
        &self,
        template: &Template,
        context: &Context<'_>,
    ) -> Result<String, RenderError> {
        Renderer::new(&self.filters, &self.tags).render(&template.nodes, context)
    }

    /// Add a [`Filter`].
    ///
    /// If a `Filter` with the given name already exists in the [`Engine`], it is overwritten.
    ///
    /// # Examples
    ///
    /// ```
    /// use quill::{error::FilterError, Engine};
    /// use serde_json::{json, Value};
    ///
    /// fn to_lowercase(value: &Value, _: &[Value]) -> Result<Value, FilterError> {
    ///     match value {
    ///         Value::String(string) => Ok(json!(string.to_lowercase())),
    ///         _ => Err(FilterError::build("requires string input")),
    ///     }
    /// }
    ///
    /// let mut engine = Engine::new();
    /// engine.register_filter("to_lowercase", to_lowercase);
    /// assert!(engine.get_filter("to_lowercase").is_some());
    /// ```
    pub fn register_filter<N, T>(&mut self, name: N, filter: T)
    where
        N: Into<String>,
        T: Filter + 'static,
    {
        self.insert_filter(name.into(), Box::new(filter));
    }

    /// Add a [`Filter`].
    ///
    /// Returns the [`Engine`], so additional methods may be chained.
    #[inline]
    pub fn with_filter<N, T>(mut self, name: N, filter: T) -> Self
    where
        N: Into<String>,
        T: Filter + 'static,
    {
        self.register_filter(name, filter);
        self
    }

    /// Add a [`Tag`].
    ///
    /// If a `Tag` with the given name already exists in the [`Engine`], it is overwritten.
    ///
    /// Whether a tag has a body changes how templates are parsed, so the
    /// compile cache is cleared.
    pub fn register_tag<N, T>(&mut self, name: N, tag: T)
    where
        N: Into<String>,
        T: Tag + 'static,
    {
        self.insert_tag(name.into(), Box::new(tag));
    }

    /// Add a [`Tag`].
    ///
    /// Returns the [`Engine`], so additional methods may be chained.
    #[inline]
    pub fn with_tag<N, T>(mut self, name: N, tag: T) -> Self
    where
        N: Into<String>,
        T: Tag + 'static,
    {
        self.register_tag(name, tag);
        self
    }

    /// Return the filter with the given name, if it exists in Engine.
    #[inline]
    pub fn get_filter(&self, name: &str) -> Option<&dyn Filter> {
        self.filters.get(name).map(|filter| filter.as_ref())
    }

    /// Return the tag with the given name, if it exists in Engine.
    #[inline]
    pub fn get_tag(&self, name: &str) -> Option<&dyn Tag> {
        self.tags.get(name).map(|tag| tag.as_ref())
    }

    /// Remove every compiled [`Template`] from the cache.
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            lock(cache).clear();
        }
    }

    fn insert_filter(&mut self, name: String, filter: Box<dyn Filter>) {
        debug!(filter = %name, "registering filter");
        self.filters.insert(name, filter);
    }

    fn insert_tag(&mut self, name: String, tag: Box<dyn Tag>) {
        debug!(tag = %name, kind = ?tag.kind(), "registering tag");
        self.tags.insert(name, tag);
        self.clear_cache();
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// Lock the cache, recovering it if a previous holder panicked.
fn lock(cache: &Cache) -> MutexGuard<'_, LruCache<String, Arc<Template>>> {
    cache.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Provides methods to configure and build an [`Engine`].
///
/// # Examples
///
/// ```
/// use quill::{syntax::Builder, Context, EngineBuilder};
///
/// let engine = EngineBuilder::new()
///     .with_syntax(Builder::new().with_expression("<<", ">>").to_syntax())
///     .with_cache_capacity(16)
///     .build();
///
/// let result = engine.render("hello, << name >>!", &Context::new().with_must("name", "taylor"));
/// assert_eq!(result.unwrap(), "hello, taylor!");
/// ```
pub struct EngineBuilder {
    syntax: Option<Syntax>,
    capacity: usize,
    builtins: bool,
}

impl EngineBuilder {
    /// Create a new [`EngineBuilder`].
    ///
    /// Uses the default markers, keeps [`DEFAULT_CACHE_CAPACITY`] compiled
    /// templates and registers the built-in filters and tags.
    #[inline]
    pub fn new() -> Self {
        Self {
            syntax: None,
            capacity: DEFAULT_CACHE_CAPACITY,
            builtins: true,
        }
    }

    /// Set the [`Syntax`] used to find expressions and tags.
    #[inline]
    pub fn with_syntax(mut self, syntax: Syntax) -> Self {
        self.syntax = Some(syntax);
        self
    }

    /// Set how many compiled templates are kept, `0` disables the cache.
    #[inline]
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Do not register the built-in filters and tags.
    #[inline]
    pub fn without_builtins(mut self) -> Self {
        self.builtins = false;
        self
    }

    /// Return the configured [`Engine`].
    pub fn build(self) -> Engine {
        let syntax = self.syntax.unwrap_or_else(|| Builder::new().to_syntax());
        let mut engine = Engine {
            finder: Finder::new(syntax),
            filters: Filters::new(),
            tags: Tags::new(),
            cache: NonZeroUsize::new(self.capacity).map(|capacity| Mutex::new(LruCache::new(capacity))),
        };

        if self.builtins {
            for (name, filter) in builtin_filters::all() {
                engine.insert_filter(name.to_owned(), filter);
            }
            for (name, tag) in builtin_tags::all() {
                engine.insert_tag(name.to_owned(), tag);
            }
        }

        engine
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
