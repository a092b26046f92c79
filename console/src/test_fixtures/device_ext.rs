// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{sync::Arc, time::Duration};

use super::{StdoutMock, gen_input_stream, gen_input_stream_then_pending,
            gen_input_stream_with_delay};
use crate::{CrosstermEventResult, InputDevice, OutputDevice, StdMutex};

pub trait OutputDeviceExt {
    fn new_mock() -> (OutputDevice, StdoutMock);
}

impl OutputDeviceExt for OutputDevice {
    fn new_mock() -> (OutputDevice, StdoutMock) {
        let stdout_mock = StdoutMock::default();
        let this = OutputDevice {
            resource: Arc::new(StdMutex::new(stdout_mock.clone())),
            is_mock: true,
        };
        (this, stdout_mock)
    }
}

pub trait InputDeviceExt {
    /// Events are delivered immediately and then the stream ends.
    fn new_mock(generator_vec: Vec<CrosstermEventResult>) -> InputDevice;

    fn new_mock_with_delay(
        generator_vec: Vec<CrosstermEventResult>,
        delay: Duration,
    ) -> InputDevice;

    /// Events are delivered immediately and then the device blocks forever, like an idle
    /// keyboard.
    fn new_mock_then_idle(generator_vec: Vec<CrosstermEventResult>) -> InputDevice;
}

impl InputDeviceExt for InputDevice {
    fn new_mock(generator_vec: Vec<CrosstermEventResult>) -> InputDevice {
        InputDevice {
            resource: gen_input_stream(generator_vec),
        }
    }

    fn new_mock_with_delay(
        generator_vec: Vec<CrosstermEventResult>,
        delay: Duration,
    ) -> InputDevice {
        InputDevice {
            resource: gen_input_stream_with_delay(generator_vec, delay),
        }
    }

    fn new_mock_then_idle(generator_vec: Vec<CrosstermEventResult>) -> InputDevice {
        InputDevice {
            resource: gen_input_stream_then_pending(generator_vec),
        }
    }
}
