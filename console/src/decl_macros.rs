// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// Shorthand for `Ok(())`.
#[macro_export]
macro_rules! ok {
    () => {
        Ok(())
    };
}

/// Lock the [`crate::OutputDevice`] and get a `&mut dyn Write` to it. The lock is held
/// until the end of the enclosing scope. Don't call this again in the same scope, it
/// will deadlock! Use a separate block scope instead.
///
/// ```
/// use r3bl_console::{lock_output_device_as_mut, OutputDevice};
/// let device = OutputDevice::new_stdout();
/// {
///     let term = lock_output_device_as_mut!(device);
///     let _ = term.write_all(b"Hello, world!\r\n");
/// } // The lock is released here.
/// ```
#[macro_export]
macro_rules! lock_output_device_as_mut {
    ($device:expr) => {
        &mut *$device.lock()
    };
}
