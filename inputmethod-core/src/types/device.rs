//! Input device descriptors and unconventional device events

/// Broad class of the device a key event originated from.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceClass {
    #[default]
    None = 0,
    Seat = 1,
    Keyboard = 2,
    Mouse = 3,
    Touch = 4,
    Pen = 5,
    Wand = 6,
    Gamepad = 7,
}

impl DeviceClass {
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            1 => Self::Seat,
            2 => Self::Keyboard,
            3 => Self::Mouse,
            4 => Self::Touch,
            5 => Self::Pen,
            6 => Self::Wand,
            7 => Self::Gamepad,
            _ => Self::None,
        }
    }
}

/// Finer-grained device kind within a class.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceSubclass {
    #[default]
    None = 0,
    Finger = 1,
    Fingernail = 2,
    Knuckle = 3,
    Palm = 4,
    HandSize = 5,
    HandFlat = 6,
    PenTip = 7,
    Trackpad = 8,
    Trackpoint = 9,
    Trackball = 10,
    Remocon = 11,
    VirtualKeyboard = 12,
}

impl DeviceSubclass {
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            1 => Self::Finger,
            2 => Self::Fingernail,
            3 => Self::Knuckle,
            4 => Self::Palm,
            5 => Self::HandSize,
            6 => Self::HandFlat,
            7 => Self::PenTip,
            8 => Self::Trackpad,
            9 => Self::Trackpoint,
            10 => Self::Trackball,
            11 => Self::Remocon,
            12 => Self::VirtualKeyboard,
            _ => Self::None,
        }
    }
}

/// Describes the device a key event came from.
///
/// Built immediately before each key-event dispatch and lent to the callback
/// for that call only; clone it to keep the data afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    name: String,
    class: DeviceClass,
    subclass: DeviceSubclass,
}

impl DeviceInfo {
    pub fn new(name: String, class: DeviceClass, subclass: DeviceSubclass) -> Self {
        Self {
            name,
            class,
            subclass,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn class(&self) -> DeviceClass {
        self.class
    }

    pub fn subclass(&self) -> DeviceSubclass {
        self.subclass
    }
}

/// Kind of unconventional input device that produced an event.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputDeviceType {
    Unknown = 0,
    Rotary = 1,
}

/// Rotation direction of a rotary device such as a wearable bezel.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotaryDirection {
    Clockwise = 0,
    CounterClockwise = 1,
}

impl RotaryDirection {
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            1 => Self::CounterClockwise,
            _ => Self::Clockwise,
        }
    }
}

/// Event payload of a rotary input device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotaryEvent {
    direction: RotaryDirection,
    time_stamp: u32,
}

impl RotaryEvent {
    pub fn new(direction: RotaryDirection, time_stamp: u32) -> Self {
        Self {
            direction,
            time_stamp,
        }
    }

    pub fn direction(&self) -> RotaryDirection {
        self.direction
    }

    pub fn time_stamp(&self) -> u32 {
        self.time_stamp
    }
}

/// Device-specific payload handed to the input-device-event callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputDeviceEvent {
    Rotary(RotaryEvent),
    Unknown,
}

impl InputDeviceEvent {
    pub fn device_type(&self) -> InputDeviceType {
        match self {
            InputDeviceEvent::Rotary(_) => InputDeviceType::Rotary,
            InputDeviceEvent::Unknown => InputDeviceType::Unknown,
        }
    }

    /// Rotary payload, if this event came from a rotary device.
    pub fn rotary(&self) -> Option<&RotaryEvent> {
        match self {
            InputDeviceEvent::Rotary(event) => Some(event),
            InputDeviceEvent::Unknown => None,
        }
    }
}
