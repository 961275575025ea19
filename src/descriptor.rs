use indexmap::IndexMap;

use crate::convert::{FromNode, MapEnv, ToNode};
use crate::error::HookStage;
use crate::tree::Node;

/// A type that can be mapped to and from a document table.
///
/// Without runtime introspection, every mapped type declares its own field
/// descriptor list once; the resolver caches the result for the process
/// lifetime and applies naming and ordering options on top.
pub trait TableMapped: Default + 'static {
    fn layout() -> Layout<Self>;

    /// Name used in diagnostics (hook failures, trace logging).
    fn type_name() -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Marker for generated classes that carry instance-level comments: a
/// class-wide comment plus a per-value comment map, so comments survive a
/// parse/edit/serialize cycle alongside the data.
pub trait TableComment {
    fn class_comment(&mut self) -> &mut String;
    fn value_comments(&mut self) -> &mut IndexMap<String, String>;
}

/// An enum-like type matched by symbolic variant name.
pub trait Symbolic: Copy + 'static {
    fn variants() -> &'static [(&'static str, Self)];

    fn name(self) -> &'static str;
}

pub(crate) type DecodeFn<T> = Box<dyn Fn(&mut T, &Node, &mut MapEnv<'_>) + Send + Sync>;
pub(crate) type EncodeFn<T> = Box<dyn Fn(&T, &mut MapEnv<'_>) -> Option<Node> + Send + Sync>;
type HookFn<T> = Box<dyn Fn(&mut T) -> Result<(), String> + Send + Sync>;

/// Per-member mapping metadata plus the capability closures that read and
/// write the member. Built once per type through [`Field`], consumed by the
/// resolver and the mapping engine.
pub struct FieldDescriptor<T> {
    pub(crate) member_name: &'static str,
    pub(crate) renamed: Option<&'static str>,
    pub(crate) order: Option<i32>,
    pub(crate) required: bool,
    pub(crate) ignored: bool,
    pub(crate) comment: Option<&'static str>,
    pub(crate) is_static: bool,
    pub(crate) decode: DecodeFn<T>,
    pub(crate) encode: EncodeFn<T>,
}

impl<T> FieldDescriptor<T> {
    fn new(member_name: &'static str, decode: DecodeFn<T>, encode: EncodeFn<T>) -> Self {
        FieldDescriptor {
            member_name,
            renamed: None,
            order: None,
            required: false,
            ignored: false,
            comment: None,
            is_static: false,
            decode,
            encode,
        }
    }

    /// Explicit source-name override. An overridden name is used verbatim,
    /// bypassing separator normalization.
    #[must_use]
    pub fn renamed(mut self, source_name: &'static str) -> Self {
        self.renamed = Some(source_name);
        self
    }

    /// Explicit order. Ordered fields sort ascending before all unordered
    /// ones; ties fall back to declaration order.
    #[must_use]
    pub fn order(mut self, order: i32) -> Self {
        self.order = Some(order);
        self
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Excluded from resolution entirely; the matching key counts as
    /// unmatched if present in a source table.
    #[must_use]
    pub fn ignored(mut self) -> Self {
        self.ignored = true;
        self
    }

    #[must_use]
    pub fn comment(mut self, text: &'static str) -> Self {
        self.comment = Some(text);
        self
    }
}

/// Field constructors. Each returns a [`FieldDescriptor`] that the fluent
/// metadata methods can refine before it is added to a [`Layout`].
pub struct Field;

impl Field {
    /// A member whose type converts structurally: scalars, datetimes,
    /// `Vec`, `Option`, `IndexMap<String, _>`, or a raw `Node` subtree.
    pub fn value<T, V, G, S>(name: &'static str, get: G, set: S) -> FieldDescriptor<T>
    where
        T: 'static,
        V: FromNode + ToNode + 'static,
        G: Fn(&T) -> V + Send + Sync + 'static,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        FieldDescriptor::new(
            name,
            Box::new(move |target, node, env| {
                if let Some(v) = V::from_node(node, env) {
                    set(target, v);
                }
            }),
            Box::new(move |target, _env| get(target).to_node()),
        )
    }

    /// A nested table member mapping to another [`TableMapped`] type.
    pub fn nested<T, V, G, S>(name: &'static str, get: G, set: S) -> FieldDescriptor<T>
    where
        T: 'static,
        V: TableMapped,
        G: Fn(&T) -> V + Send + Sync + 'static,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        FieldDescriptor::new(
            name,
            Box::new(move |target, node, env| match node {
                Node::Table(table) => {
                    let v = crate::mapping::decode_table::<V>(table, env);
                    set(target, v);
                }
                other => env.mismatch("table", other),
            }),
            Box::new(move |target, env| {
                Some(Node::Table(crate::mapping::encode_table(&get(target), env)))
            }),
        )
    }

    /// An array-of-tables member mapping to `Vec<V>` of a [`TableMapped`]
    /// type. Element failures are attributed to `path[index]` and the
    /// failing element is skipped.
    pub fn nested_seq<T, V, G, S>(name: &'static str, get: G, set: S) -> FieldDescriptor<T>
    where
        T: 'static,
        V: TableMapped,
        G: Fn(&T) -> Vec<V> + Send + Sync + 'static,
        S: Fn(&mut T, Vec<V>) + Send + Sync + 'static,
    {
        FieldDescriptor::new(
            name,
            Box::new(move |target, node, env| match node {
                Node::Array(items) => {
                    let mut out = Vec::with_capacity(items.len());
                    for (i, item) in items.iter().enumerate() {
                        env.enter(format!("[{i}]"));
                        match item {
                            Node::Table(table) => {
                                out.push(crate::mapping::decode_table::<V>(table, env));
                            }
                            other => env.mismatch("table", other),
                        }
                        env.leave();
                    }
                    set(target, out);
                }
                other => env.mismatch("array of tables", other),
            }),
            Box::new(move |target, env| {
                let nodes = get(target)
                    .iter()
                    .map(|v| Node::Table(crate::mapping::encode_table(v, env)))
                    .collect();
                Some(Node::Array(nodes))
            }),
        )
    }

    /// An enum-like member matched by symbolic variant name. Matching is
    /// exact, or ASCII case-insensitive when `property_name_case_insensitive`
    /// is set; an unmatched name is a type mismatch.
    pub fn symbolic<T, V, G, S>(name: &'static str, get: G, set: S) -> FieldDescriptor<T>
    where
        T: 'static,
        V: Symbolic,
        G: Fn(&T) -> V + Send + Sync + 'static,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        FieldDescriptor::new(
            name,
            Box::new(move |target, node, env| match node {
                Node::String(text) => {
                    let case_insensitive = env.options().property_name_case_insensitive;
                    let hit = V::variants().iter().find(|(variant, _)| {
                        if case_insensitive {
                            variant.eq_ignore_ascii_case(text)
                        } else {
                            *variant == text
                        }
                    });
                    match hit {
                        Some((_, v)) => set(target, *v),
                        None => {
                            let names: Vec<&str> =
                                V::variants().iter().map(|(n, _)| *n).collect();
                            env.mismatch(format!("one of {names:?}"), node);
                        }
                    }
                }
                other => env.mismatch("string (symbolic name)", other),
            }),
            Box::new(move |target, _env| Some(Node::String(get(target).name().to_string()))),
        )
    }

    /// A member with a registered converter. The converter takes priority
    /// over structural conversion; failures on either direction classify as
    /// converter errors. An encoder returning `Ok(None)` omits the entry.
    pub fn custom<T, E, D>(name: &'static str, encode: E, decode: D) -> FieldDescriptor<T>
    where
        T: 'static,
        E: Fn(&T) -> Result<Option<Node>, String> + Send + Sync + 'static,
        D: Fn(&mut T, &Node) -> Result<(), String> + Send + Sync + 'static,
    {
        FieldDescriptor::new(
            name,
            Box::new(move |target, node, env| {
                if let Err(cause) = decode(target, node) {
                    env.converter_failure(cause);
                }
            }),
            Box::new(move |target, env| match encode(target) {
                Ok(node) => node,
                Err(cause) => {
                    env.converter_failure(cause);
                    None
                }
            }),
        )
    }

    /// A type-level member, read and written against the type itself rather
    /// than an instance. Only mapped when `allow_static_property` is set.
    pub fn static_value<T, V, G, S>(name: &'static str, get: G, set: S) -> FieldDescriptor<T>
    where
        T: 'static,
        V: FromNode + ToNode + 'static,
        G: Fn() -> V + Send + Sync + 'static,
        S: Fn(V) + Send + Sync + 'static,
    {
        let mut descriptor = FieldDescriptor::<T>::new(
            name,
            Box::new(move |_target, node, env| {
                if let Some(v) = V::from_node(node, env) {
                    set(v);
                }
            }),
            Box::new(move |_target, _env| get().to_node()),
        );
        descriptor.is_static = true;
        descriptor
    }
}

pub(crate) struct Hook<T> {
    pub(crate) stage: HookStage,
    pub(crate) order: i32,
    pub(crate) run: HookFn<T>,
}

/// The declared descriptor list of one mapped type: fields in declaration
/// order plus lifecycle hooks. The resolver turns this into option-applied
/// resolved form.
pub struct Layout<T> {
    pub(crate) fields: Vec<FieldDescriptor<T>>,
    pub(crate) hooks: Vec<Hook<T>>,
}

impl<T> Layout<T> {
    #[must_use]
    pub fn new() -> Self {
        Layout {
            fields: Vec::new(),
            hooks: Vec::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, field: FieldDescriptor<T>) -> Self {
        self.fields.push(field);
        self
    }

    /// Runs before field assignment, in ascending order.
    #[must_use]
    pub fn pre_hook(
        mut self,
        order: i32,
        run: impl Fn(&mut T) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        self.hooks.push(Hook {
            stage: HookStage::Pre,
            order,
            run: Box::new(run),
        });
        self
    }

    /// Runs after all assignment completes, in ascending order.
    #[must_use]
    pub fn post_hook(
        mut self,
        order: i32,
        run: impl Fn(&mut T) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        self.hooks.push(Hook {
            stage: HookStage::Post,
            order,
            run: Box::new(run),
        });
        self
    }
}

impl<T> Default for Layout<T> {
    fn default() -> Self {
        Self::new()
    }
}
