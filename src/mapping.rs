use std::collections::HashSet;

use crate::convert::MapEnv;
use crate::descriptor::TableMapped;
use crate::error::HookStage;
use crate::resolver::{self, ResolvedField};
use crate::tree::Table;

/// Reads a table into a fresh `T`, recording every problem found into the
/// environment's sink. Always completes the walk; the caller decides what
/// the accumulated problems mean for the given handling mode.
pub(crate) fn decode_table<T: TableMapped>(table: &Table, env: &mut MapEnv<'_>) -> T {
    log::trace!("decoding table into {}", T::type_name());
    let resolved = resolver::resolve::<T>(env.options());
    let mut value = T::default();

    for &hook_index in &resolved.pre_hooks {
        let hook = &resolved.layout.hooks[hook_index];
        if let Err(cause) = (hook.run)(&mut value) {
            env.hook_failure(HookStage::Pre, T::type_name(), cause);
        }
    }

    let case_insensitive = env.options().property_name_case_insensitive;
    let mut matched: HashSet<&str> = HashSet::new();

    let groups: [(&[ResolvedField], bool); 2] = [
        (&resolved.instance, true),
        (&resolved.statics, env.options().allow_static_property),
    ];
    for (slots, enabled) in groups {
        if !enabled {
            continue;
        }
        for slot in slots {
            let field = &resolved.layout.fields[slot.index];
            let found = if case_insensitive {
                table.get_ignore_case(&slot.source_name)
            } else {
                table.get_key_value(&slot.source_name)
            };
            match found {
                Some((stored_key, node)) => {
                    matched.insert(stored_key);
                    env.enter(slot.source_name.clone());
                    (field.decode)(&mut value, node, env);
                    env.leave();
                }
                None if field.required => {
                    env.enter(slot.source_name.clone());
                    env.missing_required();
                    env.leave();
                }
                None => {}
            }
        }
    }

    // Keys never claimed by a descriptor: legal extra data unless strict
    // consistency was requested, but always recorded.
    for (key, _) in table.iter() {
        if !matched.contains(key) {
            env.enter(key);
            env.unmatched();
            env.leave();
        }
    }

    for &hook_index in &resolved.post_hooks {
        let hook = &resolved.layout.hooks[hook_index];
        if let Err(cause) = (hook.run)(&mut value) {
            env.hook_failure(HookStage::Post, T::type_name(), cause);
        }
    }

    value
}

/// Writes `value` into a new table in resolver order, which becomes the
/// table's insertion order. Fields encoding to `None` are omitted.
pub(crate) fn encode_table<T: TableMapped>(value: &T, env: &mut MapEnv<'_>) -> Table {
    log::trace!("encoding {} into a table", T::type_name());
    let resolved = resolver::resolve::<T>(env.options());
    let mut out = Table::new();

    let groups: [(&[ResolvedField], bool); 2] = [
        (&resolved.instance, true),
        (&resolved.statics, env.options().allow_static_property),
    ];
    for (slots, enabled) in groups {
        if !enabled {
            continue;
        }
        for slot in slots {
            let field = &resolved.layout.fields[slot.index];
            env.enter(slot.source_name.clone());
            if let Some(node) = (field.encode)(value, env) {
                out.insert(slot.source_name.clone(), node);
            }
            env.leave();
        }
    }

    out
}
