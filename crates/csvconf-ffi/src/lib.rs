//! C FFI bindings for csvconf-core
//!
//! Exposes a table store to C/C++ game code. Strings returned by this
//! library must be released with `csvconf_free_string`.

use csvconf_core::{Store, StoreConfig};
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};
use std::ptr;
use std::sync::Mutex;

/// Opaque handle to a store
pub struct FfiStore {
    inner: Store,
    last_error: Mutex<Option<CString>>,
}

impl FfiStore {
    fn set_error(&self, message: Option<String>) {
        let message = message.and_then(|m| CString::new(m.replace('\0', " ")).ok());
        if let Ok(mut slot) = self.last_error.lock() {
            *slot = message;
        }
    }
}

/// Borrow a C string as `&str`, treating null as empty
unsafe fn str_or_empty<'a>(s: *const c_char) -> Option<&'a str> {
    if s.is_null() {
        Some("")
    } else {
        CStr::from_ptr(s).to_str().ok()
    }
}

/// Create a store
///
/// # Safety
/// - `path_prefix` and `file_suffix` must be valid C strings or null
/// - Null or empty values select the defaults
/// - Returns null if either string is not valid UTF-8
#[no_mangle]
pub unsafe extern "C" fn csvconf_store_new(
    path_prefix: *const c_char,
    file_suffix: *const c_char,
) -> *mut FfiStore {
    let (Some(prefix), Some(suffix)) = (str_or_empty(path_prefix), str_or_empty(file_suffix))
    else {
        return ptr::null_mut();
    };

    let store = FfiStore {
        inner: Store::new(StoreConfig::new(prefix, suffix)),
        last_error: Mutex::new(None),
    };
    Box::into_raw(Box::new(store))
}

/// Free a store
///
/// # Safety
/// - `store` must be a valid pointer returned by `csvconf_store_new` or null
#[no_mangle]
pub unsafe extern "C" fn csvconf_store_free(store: *mut FfiStore) {
    if !store.is_null() {
        drop(Box::from_raw(store));
    }
}

/// Load tables into the store, replacing whatever was loaded before
///
/// Returns 0 on success and -1 on failure; the failure message is then
/// available from `csvconf_last_error`.
///
/// # Safety
/// - `store` must be a valid pointer returned by `csvconf_store_new`
/// - `tables` must point to `count` valid C strings
#[no_mangle]
pub unsafe extern "C" fn csvconf_load(
    store: *const FfiStore,
    tables: *const *const c_char,
    count: usize,
) -> c_int {
    if store.is_null() || (tables.is_null() && count > 0) {
        return -1;
    }
    let store = &*store;

    let mut names = Vec::with_capacity(count);
    for i in 0..count {
        let name = *tables.add(i);
        if name.is_null() {
            store.set_error(Some(format!("table name {} is null", i)));
            return -1;
        }
        match CStr::from_ptr(name).to_str() {
            Ok(s) => names.push(s),
            Err(_) => {
                store.set_error(Some(format!("table name {} is not valid UTF-8", i)));
                return -1;
            }
        }
    }

    match store.inner.load(names) {
        Ok(_) => {
            store.set_error(None);
            0
        }
        Err(e) => {
            store.set_error(Some(e.to_string()));
            -1
        }
    }
}

/// Look up one field of the first row where `query_field` equals `query_value`
///
/// # Safety
/// - `store` must be a valid pointer returned by `csvconf_store_new`
/// - all string arguments must be valid C strings
/// - Returns an empty string when nothing matches, null on invalid input
/// - Caller must free the returned string with `csvconf_free_string`
#[no_mangle]
pub unsafe extern "C" fn csvconf_get_string(
    store: *const FfiStore,
    table: *const c_char,
    query_field: *const c_char,
    query_value: *const c_char,
    result_field: *const c_char,
) -> *mut c_char {
    if store.is_null()
        || table.is_null()
        || query_field.is_null()
        || query_value.is_null()
        || result_field.is_null()
    {
        return ptr::null_mut();
    }

    let args = (
        CStr::from_ptr(table).to_str(),
        CStr::from_ptr(query_field).to_str(),
        CStr::from_ptr(query_value).to_str(),
        CStr::from_ptr(result_field).to_str(),
    );
    let (Ok(table), Ok(query_field), Ok(query_value), Ok(result_field)) = args else {
        return ptr::null_mut();
    };

    let value = (*store)
        .inner
        .get_string(table, query_field, query_value, result_field);
    CString::new(value)
        .map(CString::into_raw)
        .unwrap_or(ptr::null_mut())
}

/// Number of rows in a loaded table, or -1 if the table is not loaded
///
/// # Safety
/// - `store` must be a valid pointer returned by `csvconf_store_new`
/// - `table` must be a valid C string
#[no_mangle]
pub unsafe extern "C" fn csvconf_table_row_count(
    store: *const FfiStore,
    table: *const c_char,
) -> isize {
    if store.is_null() || table.is_null() {
        return -1;
    }
    let Ok(table) = CStr::from_ptr(table).to_str() else {
        return -1;
    };

    (*store)
        .inner
        .snapshot()
        .table(table)
        .map(|t| t.len() as isize)
        .unwrap_or(-1)
}

/// Message of the last failed `csvconf_load`, or null if it succeeded
///
/// # Safety
/// - `store` must be a valid pointer returned by `csvconf_store_new`
/// - Caller must free the returned string with `csvconf_free_string`
#[no_mangle]
pub unsafe extern "C" fn csvconf_last_error(store: *const FfiStore) -> *mut c_char {
    if store.is_null() {
        return ptr::null_mut();
    }

    match (*store).last_error.lock() {
        Ok(slot) => slot
            .as_ref()
            .map(|s| s.clone().into_raw())
            .unwrap_or(ptr::null_mut()),
        Err(_) => ptr::null_mut(),
    }
}

/// Free a string returned by other FFI functions
///
/// # Safety
/// - `s` must be a valid pointer returned by a csvconf_* function or null
#[no_mangle]
pub unsafe extern "C" fn csvconf_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn c(s: &str) -> CString {
        CString::new(s).unwrap()
    }

    unsafe fn take_string(s: *mut c_char) -> String {
        assert!(!s.is_null());
        let out = CStr::from_ptr(s).to_str().unwrap().to_string();
        csvconf_free_string(s);
        out
    }

    #[test]
    fn test_load_and_query() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("item.csv"), "id,name\n1,sword\n2,bow\n").unwrap();
        let prefix = c(dir.path().to_str().unwrap());

        unsafe {
            let store = csvconf_store_new(prefix.as_ptr(), ptr::null());
            assert!(!store.is_null());

            let item = c("item");
            let names = [item.as_ptr()];
            assert_eq!(csvconf_load(store, names.as_ptr(), names.len()), 0);
            assert!(csvconf_last_error(store).is_null());

            let (id, two, name, npc) = (c("id"), c("2"), c("name"), c("npc"));
            let value =
                csvconf_get_string(store, item.as_ptr(), id.as_ptr(), two.as_ptr(), name.as_ptr());
            assert_eq!(take_string(value), "bow");
            assert_eq!(csvconf_table_row_count(store, item.as_ptr()), 2);
            assert_eq!(csvconf_table_row_count(store, npc.as_ptr()), -1);

            csvconf_store_free(store);
        }
    }

    #[test]
    fn test_failed_load_sets_last_error() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = c(dir.path().to_str().unwrap());

        unsafe {
            let suffix = c(".csv");
            let store = csvconf_store_new(prefix.as_ptr(), suffix.as_ptr());
            let missing = c("missing");
            let names = [missing.as_ptr()];
            assert_eq!(csvconf_load(store, names.as_ptr(), names.len()), -1);

            let message = take_string(csvconf_last_error(store));
            assert!(message.contains("missing"));

            csvconf_store_free(store);
        }
    }

    #[test]
    fn test_null_store_is_rejected() {
        unsafe {
            assert_eq!(csvconf_load(ptr::null(), ptr::null(), 0), -1);
            assert!(csvconf_get_string(
                ptr::null(),
                ptr::null(),
                ptr::null(),
                ptr::null(),
                ptr::null()
            )
            .is_null());
            assert_eq!(csvconf_table_row_count(ptr::null(), ptr::null()), -1);
        }
    }
}
