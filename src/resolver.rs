use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;

use crate::descriptor::{Layout, TableMapped};
use crate::error::HookStage;
use crate::options::{MapperOptions, ResolutionKey};
use crate::utils;

// Process-lifetime caches, populated on first use and never evicted. The
// set of distinct mapped types is bounded by the program's compiled types,
// and the resolution keys by the option fingerprints actually used.
//
// Population discipline: compute outside the lock, install under the write
// lock with `or_insert_with`. Two threads racing on the same type both
// compute; the first install wins and the loser's value is discarded.
static LAYOUTS: Lazy<RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));
static RESOLVED: Lazy<RwLock<HashMap<(TypeId, ResolutionKey), Arc<dyn Any + Send + Sync>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

fn downcast_entry<X: Send + Sync + 'static>(entry: Arc<dyn Any + Send + Sync>) -> Arc<X> {
    entry
        .downcast()
        .unwrap_or_else(|_| unreachable!("cache entries are keyed by type id"))
}

pub(crate) struct ResolvedField {
    pub(crate) index: usize,
    pub(crate) source_name: String,
    order: Option<i32>,
}

/// A type's declared layout with naming and ordering options applied:
/// instance fields and static fields in resolver order, hooks sorted by
/// declared order. Shared behind an `Arc` out of the cache.
pub struct ResolvedLayout<T> {
    pub(crate) layout: Arc<Layout<T>>,
    pub(crate) instance: Vec<ResolvedField>,
    pub(crate) statics: Vec<ResolvedField>,
    pub(crate) pre_hooks: Vec<usize>,
    pub(crate) post_hooks: Vec<usize>,
}

impl<T> ResolvedLayout<T> {
    /// Effective source names of instance fields, in resolver order.
    #[must_use]
    pub fn field_names(&self) -> Vec<&str> {
        self.instance
            .iter()
            .map(|f| f.source_name.as_str())
            .collect()
    }

    /// Effective source names of static fields, in resolver order.
    #[must_use]
    pub fn static_names(&self) -> Vec<&str> {
        self.statics.iter().map(|f| f.source_name.as_str()).collect()
    }
}

/// Resolves the descriptor list for `T` under the given options.
///
/// Idempotent: the same type and options always produce the same resolved
/// list, and repeated calls share one cached instance. Safe to call from
/// multiple threads; see the cache discipline above.
pub fn resolve<T: TableMapped>(options: &MapperOptions) -> Arc<ResolvedLayout<T>> {
    let key = (TypeId::of::<T>(), options.resolution_key());
    if let Some(hit) = RESOLVED
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .get(&key)
    {
        return downcast_entry(hit.clone());
    }

    let layout = raw_layout::<T>();
    let built = Arc::new(build_resolved(&layout, options));

    let mut map = RESOLVED
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let entry = map
        .entry(key)
        .or_insert_with(move || built as Arc<dyn Any + Send + Sync>);
    downcast_entry(entry.clone())
}

fn raw_layout<T: TableMapped>() -> Arc<Layout<T>> {
    let key = TypeId::of::<T>();
    if let Some(hit) = LAYOUTS
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .get(&key)
    {
        return downcast_entry(hit.clone());
    }

    let built = Arc::new(T::layout());
    log::debug!("registered layout for {}", T::type_name());

    let mut map = LAYOUTS
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let entry = map
        .entry(key)
        .or_insert_with(move || built as Arc<dyn Any + Send + Sync>);
    downcast_entry(entry.clone())
}

fn build_resolved<T: TableMapped>(
    layout: &Arc<Layout<T>>,
    options: &MapperOptions,
) -> ResolvedLayout<T> {
    let mut instance = Vec::new();
    let mut statics = Vec::new();

    for (index, field) in layout.fields.iter().enumerate() {
        if field.ignored {
            continue;
        }
        let source_name = match field.renamed {
            Some(name) => name.to_string(),
            None if options.remove_key_word_separator => {
                utils::collapse_separators(field.member_name, &options.key_word_separators)
            }
            None => field.member_name.to_string(),
        };
        let slot = ResolvedField {
            index,
            source_name,
            order: field.order,
        };
        if field.is_static {
            statics.push(slot);
        } else {
            instance.push(slot);
        }
    }

    // Explicitly ordered fields ascending, then unordered ones; stable sort
    // keeps declaration order for ties and for the unordered tail.
    sort_slots(&mut instance);
    sort_slots(&mut statics);

    let mut pre_hooks: Vec<usize> = Vec::new();
    let mut post_hooks: Vec<usize> = Vec::new();
    for (index, hook) in layout.hooks.iter().enumerate() {
        match hook.stage {
            HookStage::Pre => pre_hooks.push(index),
            HookStage::Post => post_hooks.push(index),
        }
    }
    pre_hooks.sort_by_key(|&i| layout.hooks[i].order);
    post_hooks.sort_by_key(|&i| layout.hooks[i].order);

    ResolvedLayout {
        layout: layout.clone(),
        instance,
        statics,
        pre_hooks,
        post_hooks,
    }
}

fn sort_slots(slots: &mut [ResolvedField]) {
    slots.sort_by_key(|slot| (slot.order.is_none(), slot.order.unwrap_or(i32::MAX)));
}
