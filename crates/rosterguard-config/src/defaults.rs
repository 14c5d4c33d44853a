//! Default value functions for serde deserialization.
//!
//! These functions forward to constants defined in `rosterguard_core::defaults`.

use rosterguard_core::defaults;

/// Generate default value functions that forward to rosterguard_core::defaults constants.
macro_rules! default_fns {
    ($($fn_name:ident => $const_name:ident : $ty:ty),* $(,)?) => {
        $(
            pub(crate) fn $fn_name() -> $ty {
                defaults::$const_name
            }
        )*
    };
}

/// Generate default value functions that return String from &str constants.
macro_rules! default_string_fns {
    ($($fn_name:ident => $const_name:ident),* $(,)?) => {
        $(
            pub(crate) fn $fn_name() -> String {
                defaults::$const_name.to_string()
            }
        )*
    };
}

default_fns! {
    default_db_port             => DEFAULT_DB_PORT: u16,
    default_db_connection_limit => DEFAULT_DB_CONNECTION_LIMIT: u32,
}

default_string_fns! {
    default_table_prefix          => DEFAULT_TABLE_PREFIX,
    default_external_id_meta_key  => DEFAULT_EXTERNAL_ID_META_KEY,
}

pub(crate) fn default_premium_markers() -> Vec<String> {
    defaults::DEFAULT_PREMIUM_MARKERS
        .iter()
        .map(|m| (*m).to_string())
        .collect()
}
