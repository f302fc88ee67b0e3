//! C-ABI host bridge around the `todo-core` sync engine.
//!
//! # Overview
//! A C (or any C-FFI) presentation layer owns the network and the rendering;
//! this library owns the todo list state and decides which requests to make.
//! Every intent function returns a list of effects. For each `Request`
//! effect the host executes the HTTP call and reports the outcome with
//! `todo_controller_complete`, quoting the effect's ticket. The completion
//! may yield further effects (the refetch after toggle/delete).
//!
//! # Design
//! - No panic unwinds into C: each export runs inside `catch_unwind` and
//!   reports failure through a null or zero return.
//! - The rendering snapshot crosses as one JSON string rather than a tree
//!   of C structs.
//! - Pointers handed out by this library go back through the matching
//!   `todo_free_*` export, never through `free`.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::catch_unwind;

use todo_core::{ApiError, Draft, DraftEdit, HttpResponse, Intent, SyncEngine, TodoClient, TodoId};

use types::*;

fn read_str(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
}

/// Run an intent against the controller behind `ctrl`. Null in, null out.
fn dispatch(ctrl: *mut FfiController, intent: Intent) -> *mut FfiEffectList {
    catch_unwind(|| {
        if ctrl.is_null() {
            return std::ptr::null_mut();
        }
        let ctrl = unsafe { &mut *ctrl };
        let effects = ctrl.engine.handle(&mut ctrl.state, intent);
        ctrl.export(effects)
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// Install a stderr log subscriber. `filter` uses `RUST_LOG` syntax; null
/// means "warn". Calling it again is a no-op.
#[unsafe(no_mangle)]
pub extern "C" fn todo_logging_init(filter: *const c_char) {
    let _ = catch_unwind(|| {
        let filter = read_str(filter).unwrap_or_else(|| "warn".to_string());
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
            .with_writer(std::io::stderr)
            .try_init();
    });
}

/// Create a controller talking to the service at `base_url`.
///
/// Returns null if `base_url` is null or if an internal panic occurs.
/// The caller must free the returned pointer with `todo_controller_free`.
#[unsafe(no_mangle)]
pub extern "C" fn todo_controller_new(base_url: *const c_char) -> *mut FfiController {
    catch_unwind(|| {
        let Some(url) = read_str(base_url) else {
            return std::ptr::null_mut();
        };
        let engine = SyncEngine::new(TodoClient::new(&url));
        Box::into_raw(Box::new(FfiController::new(engine)))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a controller created by `todo_controller_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn todo_controller_free(ctrl: *mut FfiController) {
    if !ctrl.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(ctrl) });
        });
    }
}

// ---------------------------------------------------------------------------
// Intents
// ---------------------------------------------------------------------------

/// Initial load; yields one list request.
#[unsafe(no_mangle)]
pub extern "C" fn todo_controller_mount(ctrl: *mut FfiController) -> *mut FfiEffectList {
    dispatch(ctrl, Intent::Mounted)
}

/// Submit a draft. Null `title`/`description` count as empty strings, so a
/// null title yields an empty effect list.
#[unsafe(no_mangle)]
pub extern "C" fn todo_controller_create(
    ctrl: *mut FfiController,
    title: *const c_char,
    description: *const c_char,
) -> *mut FfiEffectList {
    let draft = Draft::new(
        read_str(title).unwrap_or_default(),
        read_str(description).unwrap_or_default(),
    );
    dispatch(ctrl, Intent::CreateRequested(draft))
}

/// Flip `completed` on the loaded todo with `id`.
#[unsafe(no_mangle)]
pub extern "C" fn todo_controller_toggle(ctrl: *mut FfiController, id: i64) -> *mut FfiEffectList {
    dispatch(ctrl, Intent::ToggleRequested(TodoId(id)))
}

#[unsafe(no_mangle)]
pub extern "C" fn todo_controller_delete(ctrl: *mut FfiController, id: i64) -> *mut FfiEffectList {
    dispatch(ctrl, Intent::DeleteRequested(TodoId(id)))
}

/// Yields one `ApplyTheme` effect carrying the new scheme.
#[unsafe(no_mangle)]
pub extern "C" fn todo_controller_toggle_theme(ctrl: *mut FfiController) -> *mut FfiEffectList {
    dispatch(ctrl, Intent::ThemeToggleRequested)
}

/// Edit the draft. A null field is left unchanged.
#[unsafe(no_mangle)]
pub extern "C" fn todo_controller_edit_draft(
    ctrl: *mut FfiController,
    title: *const c_char,
    description: *const c_char,
) -> *mut FfiEffectList {
    let edit = DraftEdit {
        title: read_str(title),
        description: read_str(description),
    };
    dispatch(ctrl, Intent::DraftChanged(edit))
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

/// Report the outcome of the request issued under `ticket`.
///
/// `response` is null when the request failed before any status arrived.
/// Returns null if `ctrl` is null; an empty list for an unknown ticket.
#[unsafe(no_mangle)]
pub extern "C" fn todo_controller_complete(
    ctrl: *mut FfiController,
    ticket: u64,
    response: *const FfiHttpResponse,
) -> *mut FfiEffectList {
    catch_unwind(|| {
        if ctrl.is_null() {
            return std::ptr::null_mut();
        }
        let ctrl = unsafe { &mut *ctrl };
        let Some(operation) = ctrl.in_flight.remove(&ticket) else {
            tracing::warn!(ticket, "completion for unknown ticket");
            return ctrl.export(Vec::new());
        };
        let outcome = if response.is_null() {
            Err(ApiError::Transport("host reported a transport failure".to_string()))
        } else {
            let resp = unsafe { &*response };
            Ok(HttpResponse::new(resp.status, read_str(resp.body).unwrap_or_default()))
        };
        let effects = ctrl.engine.complete(&mut ctrl.state, operation, outcome);
        ctrl.export(effects)
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// The current state as JSON: `todos`, `draft`, `busy`, `theme`,
/// `revision` and a derived `summary`.
///
/// Returns null if `ctrl` is null. Free with `todo_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn todo_controller_snapshot_json(ctrl: *const FfiController) -> *mut c_char {
    catch_unwind(|| {
        if ctrl.is_null() {
            return std::ptr::null_mut();
        }
        let ctrl = unsafe { &*ctrl };
        let mut json = match serde_json::to_value(&ctrl.state) {
            Ok(json) => json,
            Err(_) => return std::ptr::null_mut(),
        };
        if let (Some(obj), Ok(summary)) = (json.as_object_mut(), serde_json::to_value(ctrl.state.summary())) {
            obj.insert("summary".to_string(), summary);
        }
        c_string(json.to_string())
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Number of requests handed out and not yet completed.
#[unsafe(no_mangle)]
pub extern "C" fn todo_controller_in_flight(ctrl: *const FfiController) -> u32 {
    catch_unwind(|| {
        if ctrl.is_null() {
            return 0;
        }
        unsafe { &*ctrl }.in_flight.len() as u32
    })
    .unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiEffectList`, including every request it carries.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn todo_free_effects(list: *mut FfiEffectList) {
    if list.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let list = unsafe { Box::from_raw(list) };
        for effect in unsafe { from_raw_slice(list.items, list.len) } {
            free_request(effect.request);
        }
    });
}

fn free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let req = unsafe { Box::from_raw(req) };
    if !req.path.is_null() {
        drop(unsafe { CString::from_raw(req.path) });
    }
    if !req.body.is_null() {
        drop(unsafe { CString::from_raw(req.body) });
    }
    for h in unsafe { from_raw_slice(req.headers, req.headers_len) } {
        if !h.key.is_null() {
            drop(unsafe { CString::from_raw(h.key) });
        }
        if !h.value.is_null() {
            drop(unsafe { CString::from_raw(h.value) });
        }
    }
}

/// Releases a string returned by `todo_controller_snapshot_json`. Null is a no-op.
#[unsafe(no_mangle)]
pub extern "C" fn todo_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { CString::from_raw(s) });
        });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
