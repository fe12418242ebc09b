//! Xlib-backed display session.
//!
//! One connection is opened for the lifetime of the session and every
//! capability maps onto a small number of Xlib calls. Button events are
//! synthesized with `XSendEvent` aimed at the window under the pointer,
//! the way receiving clients expect them.

use crate::error::{Error, Result};
use crate::session::{ButtonTarget, KeyId, PointerQuery, Session, SessionEvent, WindowId};
use std::ffi::CString;
use std::os::raw::{c_int, c_uint};
use std::ptr::null;
use x11::xlib;

const TRUE: c_int = 1;
const FALSE: c_int = 0;

/// `XSendEvent` destination meaning "the window the pointer is in".
const POINTER_WINDOW: xlib::Window = 0;

/// Keysym lookup failure marker.
const NO_SYMBOL: xlib::KeySym = 0;

/// Lock-state permutations a key is grabbed under, so Caps Lock or
/// Num Lock cannot keep a binding from matching.
const LOCK_MASKS: [c_uint; 4] = [
    0,
    xlib::LockMask,
    xlib::Mod2Mask,
    xlib::LockMask | xlib::Mod2Mask,
];

/// A live connection to an X display.
pub struct X11Session {
    display: *mut xlib::Display,
    root: xlib::Window,
    width: i32,
    height: i32,
}

impl X11Session {
    /// Connect to the default display (`$DISPLAY`).
    pub fn open() -> Result<Self> {
        let display = unsafe { xlib::XOpenDisplay(null()) };
        if display.is_null() {
            return Err(Error::DisplayOpen);
        }
        let (root, width, height) = unsafe {
            let screen = xlib::XDefaultScreen(display);
            (
                xlib::XRootWindow(display, screen),
                xlib::XDisplayWidth(display, screen),
                xlib::XDisplayHeight(display, screen),
            )
        };
        Ok(Self {
            display,
            root,
            width,
            height,
        })
    }
}

impl Drop for X11Session {
    fn drop(&mut self) {
        unsafe {
            xlib::XCloseDisplay(self.display);
        }
    }
}

impl Session for X11Session {
    fn screen_size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn query_pointer(&mut self, window: Option<WindowId>) -> Result<PointerQuery> {
        let target = window.map_or(self.root, |w| w.0 as xlib::Window);
        let mut root_return: xlib::Window = 0;
        let mut child: xlib::Window = 0;
        let mut root_x: c_int = 0;
        let mut root_y: c_int = 0;
        let mut win_x: c_int = 0;
        let mut win_y: c_int = 0;
        let mut mask: c_uint = 0;

        let on_screen = unsafe {
            xlib::XQueryPointer(
                self.display,
                target,
                &mut root_return,
                &mut child,
                &mut root_x,
                &mut root_y,
                &mut win_x,
                &mut win_y,
                &mut mask,
            )
        };
        if on_screen == FALSE {
            return Err(Error::Platform("XQueryPointer failed".into()));
        }

        Ok(PointerQuery {
            window: WindowId(target as u64),
            child: (child != 0).then_some(WindowId(child as u64)),
            root_x,
            root_y,
            win_x,
            win_y,
            mask,
        })
    }

    fn warp_absolute(&mut self, x: i32, y: i32) -> Result<()> {
        unsafe {
            xlib::XWarpPointer(self.display, 0, self.root, 0, 0, 0, 0, x, y);
        }
        Ok(())
    }

    fn warp_relative(&mut self, dx: i32, dy: i32) -> Result<()> {
        unsafe {
            xlib::XWarpPointer(self.display, 0, 0, 0, 0, 0, 0, dx, dy);
        }
        Ok(())
    }

    fn send_button(&mut self, target: ButtonTarget, button: u8, press: bool) -> Result<()> {
        let mut event: xlib::XButtonEvent = unsafe { std::mem::zeroed() };
        event.type_ = if press {
            xlib::ButtonPress
        } else {
            xlib::ButtonRelease
        };
        event.display = self.display;
        event.window = target.window.0 as xlib::Window;
        event.root = self.root;
        event.subwindow = 0;
        event.time = xlib::CurrentTime;
        event.x = target.x;
        event.y = target.y;
        event.x_root = target.root_x;
        event.y_root = target.root_y;
        // A press carries the live state from the pointer query; a
        // release carries the mask of the button coming back up.
        event.state = if press {
            target.mask as c_uint
        } else {
            button_state_mask(button)
        };
        event.button = button as c_uint;
        event.same_screen = TRUE;

        let mut wire = xlib::XEvent { button: event };
        let status = unsafe {
            xlib::XSendEvent(
                self.display,
                POINTER_WINDOW,
                TRUE,
                xlib::ButtonPressMask | xlib::ButtonReleaseMask,
                &mut wire,
            )
        };
        if status == 0 {
            return Err(Error::Platform("XSendEvent failed".into()));
        }
        Ok(())
    }

    fn set_cursor(&mut self, shape: u32) -> Result<()> {
        unsafe {
            let cursor = xlib::XCreateFontCursor(self.display, shape as c_uint);
            xlib::XDefineCursor(self.display, self.root, cursor);
            xlib::XFreeCursor(self.display, cursor);
        }
        Ok(())
    }

    fn resolve_key(&self, symbol: &str) -> Option<KeyId> {
        let name = CString::new(symbol).ok()?;
        let keysym = unsafe { xlib::XStringToKeysym(name.as_ptr()) };
        if keysym == NO_SYMBOL {
            return None;
        }
        let keycode = unsafe { xlib::XKeysymToKeycode(self.display, keysym) };
        (keycode != 0).then(|| KeyId(keycode as u32))
    }

    fn grab_key(&mut self, key: KeyId) -> Result<()> {
        for modifiers in LOCK_MASKS {
            unsafe {
                xlib::XGrabKey(
                    self.display,
                    key.0 as c_int,
                    modifiers,
                    self.root,
                    TRUE,
                    xlib::GrabModeAsync,
                    xlib::GrabModeAsync,
                );
            }
        }
        Ok(())
    }

    fn ungrab_key(&mut self, key: KeyId) -> Result<()> {
        for modifiers in LOCK_MASKS {
            unsafe {
                xlib::XUngrabKey(self.display, key.0 as c_int, modifiers, self.root);
            }
        }
        Ok(())
    }

    fn next_event(&mut self) -> Result<SessionEvent> {
        let mut event: xlib::XEvent = unsafe { std::mem::zeroed() };
        unsafe {
            xlib::XNextEvent(self.display, &mut event);
        }
        match event.get_type() {
            t if t == xlib::KeyPress => {
                let key = unsafe { event.key };
                Ok(SessionEvent::KeyPress(KeyId(key.keycode)))
            }
            _ => Ok(SessionEvent::Other),
        }
    }

    fn flush(&mut self) -> Result<()> {
        unsafe {
            xlib::XFlush(self.display);
        }
        Ok(())
    }
}

/// X state mask bit for a button number; buttons 6 and 7 have none.
fn button_state_mask(button: u8) -> c_uint {
    match button {
        1..=5 => xlib::Button1Mask << (button - 1),
        _ => 0,
    }
}
