//! Data that templates are rendered against.
//!
//! A [`Context`] wraps a root [`Value`] supplied by the caller. Tags such as
//! `for` derive child contexts that shadow names with new bindings, leaving
//! the parent untouched.
use crate::error::ContextError;
use serde::Serialize;
use serde_json::{to_value, Map, Value};
use std::fmt::{self, Display, Formatter};

/// One step of a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A property name, or a numeric string when used against an array.
    Key(String),
    /// A bracketed array index, such as `[0]`.
    Index(usize),
}

/// A dotted or indexed location within a [`Context`], such as `user.tags[0]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// Create a new [`Path`] from the given segments.
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Split the text on `.` into a [`Path`].
    ///
    /// Bracketed indices are accepted as well, so `items[0].name` and
    /// `items.0.name` describe the same location.
    ///
    /// # Examples
    ///
    /// ```
    /// use quill::context::{Path, Segment};
    ///
    /// let path = Path::parse("items[1].name");
    /// assert_eq!(
    ///     path.segments(),
    ///     &[
    ///         Segment::Key("items".into()),
    ///         Segment::Index(1),
    ///         Segment::Key("name".into())
    ///     ]
    /// );
    /// ```
    pub fn parse(text: &str) -> Self {
        let mut segments = vec![];
        for part in text.split('.') {
            let (key, mut rest) = match part.find('[') {
                Some(index) => (&part[..index], &part[index..]),
                None => (part, ""),
            };
            if !key.is_empty() || rest.is_empty() {
                segments.push(Segment::Key(key.to_string()));
            }
            while let Some(stripped) = rest.strip_prefix('[') {
                let close = stripped.find(']').unwrap_or(stripped.len());
                let inner = stripped[..close].trim_matches(|c| c == '"' || c == '\'');
                segments.push(match inner.parse::<usize>() {
                    Ok(index) => Segment::Index(index),
                    Err(_) => Segment::Key(inner.to_string()),
                });
                rest = stripped.get(close + 1..).unwrap_or_default();
            }
        }

        Self { segments }
    }

    /// Return the segments of this [`Path`].
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Append a segment.
    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    /// Return the key when the path is a single bare word, such as `in`.
    ///
    /// Tags use this to recognize their own keywords among the arguments.
    pub fn as_word(&self) -> Option<&str> {
        match self.segments.as_slice() {
            [Segment::Key(key)] => Some(key),
            _ => None,
        }
    }
}

impl Display for Path {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(key) if i == 0 => write!(f, "{key}")?,
                Segment::Key(key) => write!(f, ".{key}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// Provides storage for data that a [`Template`][`crate::Template`] can be
/// rendered with.
#[derive(Debug, Clone)]
pub struct Context<'parent> {
    /// The context this one was derived from, if any.
    parent: Option<&'parent Context<'parent>>,
    /// The root value, or the shadow bindings of a derived context.
    data: Value,
}

impl<'parent> Context<'parent> {
    /// Create a new, empty [`Context`].
    ///
    /// # Examples
    ///
    /// ```
    /// use quill::Context;
    ///
    /// let context = Context::new();
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self {
            parent: None,
            data: Value::Object(Map::new()),
        }
    }

    /// Create a [`Context`] over the given root [`Value`].
    ///
    /// The root may be any value, though only objects can be reached by name.
    #[inline]
    pub fn from_value(data: Value) -> Self {
        Self { parent: None, data }
    }

    /// Create a [`Context`] by serializing the given data.
    ///
    /// # Errors
    ///
    /// Returns an error if the serialization fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use quill::Context;
    /// use serde::Serialize;
    ///
    /// #[derive(Serialize)]
    /// struct User {
    ///     name: &'static str,
    ///     admin: bool,
    /// }
    ///
    /// #[derive(Serialize)]
    /// struct Page {
    ///     user: User,
    /// }
    ///
    /// let page = Page { user: User { name: "taylor", admin: true } };
    /// let context = Context::from_serialize(&page).unwrap();
    ///
    /// let result = quill::render("{{ user.name }} {{ user }}", &context);
    /// assert_eq!(result.unwrap(), r#"taylor {"name":"taylor","admin":true}"#);
    /// ```
    pub fn from_serialize<T>(data: &T) -> Result<Self, serde_json::Error>
    where
        T: Serialize + ?Sized,
    {
        Ok(Self::from_value(to_value(data)?))
    }

    /// Inserts a key-value pair into the [`Context`].
    ///
    /// A root that is not an object is replaced by an empty object first.
    ///
    /// # Errors
    ///
    /// Returns an error if the serialization fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use quill::Context;
    ///
    /// let mut context = Context::new();
    /// let result = context.insert("name", "taylor");
    ///
    /// assert!(result.is_ok());
    /// ```
    pub fn insert<S, T>(&mut self, key: S, value: T) -> Result<(), serde_json::Error>
    where
        S: Into<String>,
        T: Serialize,
    {
        let value = to_value(value)?;
        self.set(key, value);

        Ok(())
    }

    /// Inserts a key-value pair into the [`Context`].
    ///
    /// Returns the `Context`, so additional methods may be chained.
    ///
    /// # Errors
    ///
    /// Returns an error if the serialization fails.
    #[inline]
    pub fn with<S, T>(mut self, key: S, value: T) -> Result<Self, serde_json::Error>
    where
        S: Into<String>,
        T: Serialize,
    {
        self.insert(key, value)?;

        Ok(self)
    }

    /// Inserts a key-value pair into the [`Context`].
    ///
    /// Returns the `Context`, so additional methods may be chained.
    ///
    /// # Panics
    ///
    /// Panics if the serialization fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use quill::Context;
    ///
    /// let context = Context::new().with_must("name", "taylor");
    /// ```
    #[inline]
    pub fn with_must<S, T>(self, key: S, value: T) -> Self
    where
        S: Into<String>,
        T: Serialize,
    {
        self.with(key, value)
            .expect("value should be serializable to json")
    }

    /// Bind the [`Value`] to the key in this [`Context`].
    ///
    /// On a derived context the binding shadows any value of the same name
    /// in its ancestors.
    pub fn set<S>(&mut self, key: S, value: Value)
    where
        S: Into<String>,
    {
        if !self.data.is_object() {
            self.data = Value::Object(Map::new());
        }
        if let Value::Object(object) = &mut self.data {
            object.insert(key.into(), value);
        }
    }

    /// Derive a new [`Context`] that shadows this one.
    ///
    /// Bindings made with [`set`][`Context::set`] on the derived context are
    /// invisible to this one.
    ///
    /// # Examples
    ///
    /// ```
    /// use quill::{context::Path, Context};
    /// use serde_json::json;
    ///
    /// let context = Context::new().with_must("name", "taylor");
    /// let mut child = context.derive();
    /// child.set("name", json!("jordan"));
    ///
    /// assert_eq!(child.resolve(&Path::parse("name")).unwrap(), json!("jordan"));
    /// assert_eq!(context.resolve(&Path::parse("name")).unwrap(), json!("taylor"));
    /// ```
    #[inline]
    pub fn derive(&self) -> Context<'_> {
        Context {
            parent: Some(self),
            data: Value::Object(Map::new()),
        }
    }

    /// Resolve the [`Path`] and return a copy of the [`Value`] found there.
    ///
    /// Missing data resolves to `Value::Null`.
    ///
    /// # Errors
    ///
    /// Returns a [`ContextError`] when a non-numeric segment is used against
    /// an array, or when a segment is used against a string, number or
    /// boolean.
    pub fn resolve(&self, path: &Path) -> Result<Value, ContextError> {
        Ok(self.lookup(path)?.cloned().unwrap_or(Value::Null))
    }

    /// Resolve the [`Path`] and return a reference to the [`Value`] found
    /// there, or `None` for missing data.
    ///
    /// # Errors
    ///
    /// Fails in the same cases as [`resolve`][`Context::resolve`].
    pub fn lookup(&self, path: &Path) -> Result<Option<&Value>, ContextError> {
        let Some((first, rest)) = path.segments.split_first() else {
            return Ok(Some(self.root()));
        };

        let start = match first {
            Segment::Key(key) => match self.shadowed(key) {
                Some(value) => Some(value),
                None => step(self.root(), first, path)?,
            },
            Segment::Index(_) => step(self.root(), first, path)?,
        };

        let mut current = start;
        for segment in rest {
            current = match current {
                Some(value) => step(value, segment, path)?,
                None => return Ok(None),
            };
        }

        Ok(current)
    }

    /// Search the shadow bindings of this and any derived-from context,
    /// innermost first.
    fn shadowed(&self, key: &str) -> Option<&Value> {
        let mut context = self;
        while let Some(parent) = context.parent {
            if let Some(value) = context.data.get(key) {
                return Some(value);
            }
            context = parent;
        }
        None
    }

    /// Return the root value this context was created with.
    fn root(&self) -> &Value {
        let mut context = self;
        while let Some(parent) = context.parent {
            context = parent;
        }
        &context.data
    }
}

impl Default for Context<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Value> for Context<'_> {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

/// Take a single step from `value` along `segment`.
///
/// `None` is returned for missing data, and `null` short-circuits.
fn step<'v>(
    value: &'v Value,
    segment: &Segment,
    path: &Path,
) -> Result<Option<&'v Value>, ContextError> {
    match (value, segment) {
        (Value::Null, _) => Ok(None),
        (Value::Array(array), Segment::Index(index)) => Ok(array.get(*index)),
        (Value::Array(array), Segment::Key(key)) => match key.parse::<i64>() {
            Ok(index) => Ok(usize::try_from(index)
                .ok()
                .and_then(|index| array.get(index))),
            Err(_) => Err(ContextError::new(
                path.to_string(),
                format!("array index `{key}` is not an integer"),
            )),
        },
        (Value::Object(object), Segment::Key(key)) => Ok(object.get(key)),
        (Value::Object(object), Segment::Index(index)) => Ok(object.get(&index.to_string())),
        (_, segment) => {
            let name = match segment {
                Segment::Key(key) => key.clone(),
                Segment::Index(index) => index.to_string(),
            };
            Err(ContextError::new(
                path.to_string(),
                format!("cannot access property `{name}` on non-object"),
            ))
        }
    }
}

/// Resolve a dotted path such as `user.tags.0` against the [`Context`].
///
/// # Errors
///
/// Returns a [`ContextError`] when the path cannot be traversed, missing
/// data is not an error and resolves to `Value::Null`.
///
/// # Examples
///
/// ```
/// use quill::{context::resolve_variable, Context};
/// use serde_json::json;
///
/// let context = Context::from_value(json!({"user": {"tags": ["a", "b"]}}));
///
/// assert_eq!(resolve_variable(&context, "user.tags.1").unwrap(), json!("b"));
/// assert_eq!(resolve_variable(&context, "user.missing.deep").unwrap(), json!(null));
/// assert!(resolve_variable(&context, "user.tags.first").is_err());
/// ```
pub fn resolve_variable(context: &Context, path: &str) -> Result<Value, ContextError> {
    context.resolve(&Path::parse(path))
}
