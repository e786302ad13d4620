//! Pure resolution of a raw identifier against a table snapshot.

use crate::domain::{DeviceClass, LookupTable};

/// Knobs for a single resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Append the parenthesized variant label when the entry has one.
    pub include_type: bool,
    /// Treat an `arm` prefix as a simulator marker. Only meaningful in
    /// simulator builds; real ARM hardware reports family-prefixed
    /// identifiers.
    pub arm_is_simulator: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            include_type: true,
            arm_is_simulator: false,
        }
    }
}

/// Fixed label for simulator-architecture identifiers, selected solely by
/// the device class.
#[must_use]
pub const fn simulator_label(class: DeviceClass) -> &'static str {
    match class {
        DeviceClass::Unspecified => "Unspecified Simulator",
        DeviceClass::Phone => "iPhone Simulator",
        DeviceClass::Tablet => "iPad Simulator",
        DeviceClass::Tv => "Apple TV Simulator",
        DeviceClass::CarDisplay => "CarPlay Simulator",
        DeviceClass::Desktop => "Mac Simulator",
    }
}

/// Simulator-architecture markers: an `x86` prefix, an `arm` prefix in
/// simulator builds, or a `386` anywhere in the identifier.
fn is_simulator_marker(identifier: &str, arm_is_simulator: bool) -> bool {
    identifier.starts_with("x86")
        || (arm_is_simulator && identifier.starts_with("arm"))
        || identifier.contains("386")
}

/// Resolve `identifier` against `table`.
///
/// Always returns a displayable string:
///
/// 1. Simulator markers short-circuit to a label chosen by `class` alone.
/// 2. The family with the longest matching prefix wins; no match passes the
///    identifier through verbatim.
/// 3. An exact suffix match composes `"{family} {name}"` (plus the variant
///    label when requested); a miss yields `"Unknown {family}"`.
#[must_use]
pub fn display_name(
    table: &LookupTable,
    identifier: &str,
    class: DeviceClass,
    opts: ResolveOptions,
) -> String {
    if is_simulator_marker(identifier, opts.arm_is_simulator) {
        return simulator_label(class).to_string();
    }

    let Some((prefix, family_name)) = table.match_family(identifier) else {
        return identifier.to_string();
    };

    let suffix = &identifier[prefix.len()..];
    match table.find_model(family_name, suffix) {
        Some(entry) => match (&entry.type_label, opts.include_type) {
            (Some(type_label), true) => {
                format!("{family_name} {} ({type_label})", entry.name)
            }
            _ => format!("{family_name} {}", entry.name),
        },
        None => format!("Unknown {family_name}"),
    }
}
