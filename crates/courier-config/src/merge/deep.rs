use super::{ConfigLayer, FieldSources};

/// Where a merge records the layer of every leaf it writes.
struct Tracker<'a> {
    layer: &'a ConfigLayer,
    sources: &'a mut FieldSources,
}

/// Recursively deep-merge `overlay` into `base`, recording `layer` as the
/// source of every leaf the overlay writes.
///
/// Tables merge key by key. Scalars and arrays from the overlay replace the
/// base value, as does a table landing on a non-table. `prefix` is the
/// dotted path of `base` within the document (empty at the root).
pub fn deep_merge_tracking(
    base: &mut toml::Value,
    overlay: &toml::Value,
    prefix: &str,
    layer: &ConfigLayer,
    sources: &mut FieldSources,
) {
    let mut tracker = Tracker { layer, sources };
    merge_value(base, overlay, prefix, &mut tracker);
}

fn merge_value(
    base: &mut toml::Value,
    overlay: &toml::Value,
    path: &str,
    tracker: &mut Tracker<'_>,
) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, incoming) in overlay_table {
                let child = join(path, key);
                match base_table.get_mut(key) {
                    Some(existing) => merge_value(existing, incoming, &child, tracker),
                    None => {
                        base_table.insert(key.clone(), incoming.clone());
                        record_leaves(incoming, &child, tracker.layer, tracker.sources);
                    },
                }
            }
        },
        (base, overlay) => {
            *base = overlay.clone();
            forget_subtree(path, tracker.sources);
            record_leaves(overlay, path, tracker.layer, tracker.sources);
        },
    }
}

/// Record `layer` for every leaf under `val`, keyed by dotted path.
pub fn record_leaves(
    val: &toml::Value,
    prefix: &str,
    layer: &ConfigLayer,
    sources: &mut FieldSources,
) {
    match val {
        toml::Value::Table(table) => {
            for (key, child) in table {
                record_leaves(child, &join(prefix, key), layer, sources);
            }
        },
        leaf => {
            sources.insert(prefix.to_owned(), layer.clone());
            tracing::trace!(
                path = prefix,
                layer = %layer,
                kind = leaf.type_str(),
                "recorded source"
            );
        },
    }
}

/// Drop `path` and every path below it.
fn forget_subtree(path: &str, sources: &mut FieldSources) {
    if path.is_empty() {
        sources.clear();
        return;
    }
    let nested = format!("{path}.");
    sources.retain(|key, _| key != path && !key.starts_with(&nested));
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_owned()
    } else {
        format!("{prefix}.{key}")
    }
}
