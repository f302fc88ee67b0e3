//! C layouts for what crosses the boundary, plus the controller handle.
//!
//! # Design
//! Strings are NUL-terminated `*mut c_char`, sequences are a pointer and a
//! length backed by a boxed slice, and enums carry explicit discriminants.
//! Conversions from core types and the ownership helpers live here;
//! `lib.rs` only holds the exports.

use std::collections::HashMap;
use std::ffi::CString;
use std::os::raw::c_char;

use todo_core::{Effect, HttpMethod, Operation, SyncEngine, TodoState};

/// Opaque handle to one mounted todo list. C callers receive a pointer to
/// this and pass it back into every `todo_controller_*` function.
pub struct FfiController {
    pub(crate) engine: SyncEngine,
    pub(crate) state: TodoState,
    /// Requests handed to the host and not yet completed, by ticket.
    pub(crate) in_flight: HashMap<u64, Operation>,
    pub(crate) next_ticket: u64,
}

impl FfiController {
    pub(crate) fn new(engine: SyncEngine) -> Self {
        Self {
            engine,
            state: TodoState::new(),
            in_flight: HashMap::new(),
            next_ticket: 1,
        }
    }

    /// Convert engine effects to a heap-allocated list, registering a
    /// ticket for every request.
    pub(crate) fn export(&mut self, effects: Vec<Effect>) -> *mut FfiEffectList {
        let items: Vec<FfiEffect> = effects
            .into_iter()
            .map(|effect| match effect {
                Effect::Request(command) => {
                    let ticket = self.next_ticket;
                    self.next_ticket += 1;
                    self.in_flight.insert(ticket, command.operation);
                    FfiEffect {
                        kind: FfiEffectKind::Request,
                        ticket,
                        request: FfiHttpRequest::from_core(command.request),
                        dark: false,
                    }
                }
                Effect::ApplyTheme(theme) => FfiEffect {
                    kind: FfiEffectKind::ApplyTheme,
                    ticket: 0,
                    request: std::ptr::null_mut(),
                    dark: theme.is_dark(),
                },
            })
            .collect();

        let len = items.len() as u32;
        Box::into_raw(Box::new(FfiEffectList {
            items: into_raw_slice(items),
            len,
        }))
    }
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Put = 2,
    Delete = 3,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Put => FfiHttpMethod::Put,
            HttpMethod::Delete => FfiHttpMethod::Delete,
        }
    }
}

/// One request header, name and value as C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// A request the C host should send. Owned by the effect list it arrived in.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub path: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

/// `CString` that drops interior NULs instead of failing.
pub(crate) fn c_string(s: String) -> *mut c_char {
    CString::new(s)
        .unwrap_or_else(|e| {
            let mut bytes = e.into_vec();
            bytes.retain(|b| *b != 0);
            CString::new(bytes).unwrap_or_default()
        })
        .into_raw()
}

/// Leak a vector as a boxed slice; null when empty. Reclaim with
/// `from_raw_slice` using the same length.
pub(crate) fn into_raw_slice<T>(items: Vec<T>) -> *mut T {
    if items.is_empty() {
        return std::ptr::null_mut();
    }
    Box::into_raw(items.into_boxed_slice()) as *mut T
}

/// Take back ownership of a slice leaked by `into_raw_slice`.
///
/// # Safety
/// `ptr` must come from `into_raw_slice` with exactly `len` elements and
/// must not be used afterwards.
pub(crate) unsafe fn from_raw_slice<T>(ptr: *mut T, len: u32) -> Vec<T> {
    if ptr.is_null() || len == 0 {
        return Vec::new();
    }
    unsafe { Box::from_raw(std::ptr::slice_from_raw_parts_mut(ptr, len as usize)) }.into_vec()
}

impl FfiHttpRequest {
    /// Moves a core request onto the heap in C layout.
    pub(crate) fn from_core(req: todo_core::HttpRequest) -> *mut Self {
        let path = c_string(req.path);
        let body = match req.body {
            Some(b) => c_string(b),
            None => std::ptr::null_mut(),
        };

        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Vec<FfiHeader> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: c_string(k),
                    value: c_string(v),
                })
                .collect();
            into_raw_slice(ffi_headers)
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            path,
            headers,
            headers_len,
            body,
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// What the C host got back. Borrowed for the duration of `todo_controller_complete`.
///
/// The C caller constructs this on the stack after executing a request and
/// passes a pointer to `todo_controller_complete`. The FFI layer reads but
/// does not free these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Effects
// ---------------------------------------------------------------------------

/// What an `FfiEffect` asks the host to do.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiEffectKind {
    /// Execute `request`, then report back with `ticket`.
    Request = 0,
    /// Set (`dark = true`) or clear the global dark colour-scheme attribute.
    ApplyTheme = 1,
}

#[repr(C)]
pub struct FfiEffect {
    pub kind: FfiEffectKind,
    pub ticket: u64,
    pub request: *mut FfiHttpRequest,
    pub dark: bool,
}

/// Effects returned by every intent and completion call.
#[repr(C)]
pub struct FfiEffectList {
    pub items: *mut FfiEffect,
    pub len: u32,
}
