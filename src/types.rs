use std::error::Error;
use std::fmt;
use strum_macros::{EnumIter, IntoStaticStr};

/// Message tags exchanged with the Arduino. One signed byte on the wire.
///
/// The light codes only exist with the `lights` feature, so a build carries
/// exactly one catalog. Defining the catalog twice under one name is rejected
/// by the compiler rather than resolved to either definition:
///
/// ```compile_fail
/// #[repr(u8)]
/// enum Order { Hello = 0, AlreadyConnected = 3, Error = 4, Received = 5, StartCam = 7 }
///
/// #[repr(u8)]
/// enum Order { Hello = 0, StartCam = 7, TurnLeftLightOn = 8 }
/// ```
#[derive(Debug, EnumIter, IntoStaticStr, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum Order {
    Hello = 0,
    AlreadyConnected = 3,
    Error = 4,
    Received = 5,
    StartCam = 7,
    #[cfg(feature = "lights")]
    TurnLeftLightOn = 8,
    #[cfg(feature = "lights")]
    TurnRightLightOff = 9,
    #[cfg(feature = "lights")]
    TurnRightLightOn = 10,
    #[cfg(feature = "lights")]
    TurnLeftLightOff = 11,
    #[cfg(feature = "hardware-trigger")]
    ConfigureCamFps = 12,
    #[cfg(feature = "hardware-trigger")]
    ConfigureCamExposureTime = 13,
}

impl Order {
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Name as written in the device headers, e.g. `START_CAM`.
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// The order that switches `light` on or off.
    #[cfg(feature = "lights")]
    pub fn light_switch(light: Light, on: bool) -> Order {
        match (light, on) {
            (Light::Left, true) => Order::TurnLeftLightOn,
            (Light::Left, false) => Order::TurnLeftLightOff,
            (Light::Right, true) => Order::TurnRightLightOn,
            (Light::Right, false) => Order::TurnRightLightOff,
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

impl From<Order> for u8 {
    fn from(order: Order) -> u8 {
        order as u8
    }
}

/// A byte that does not map to any order of this build.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct UnknownOrder(pub u8);

impl fmt::Display for UnknownOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown order code: {}", self.0)
    }
}

impl Error for UnknownOrder {}

impl TryFrom<u8> for Order {
    type Error = UnknownOrder;

    fn try_from(value: u8) -> Result<Self, UnknownOrder> {
        match value {
            0 => Ok(Order::Hello),
            3 => Ok(Order::AlreadyConnected),
            4 => Ok(Order::Error),
            5 => Ok(Order::Received),
            7 => Ok(Order::StartCam),
            #[cfg(feature = "lights")]
            8 => Ok(Order::TurnLeftLightOn),
            #[cfg(feature = "lights")]
            9 => Ok(Order::TurnRightLightOff),
            #[cfg(feature = "lights")]
            10 => Ok(Order::TurnRightLightOn),
            #[cfg(feature = "lights")]
            11 => Ok(Order::TurnLeftLightOff),
            #[cfg(feature = "hardware-trigger")]
            12 => Ok(Order::ConfigureCamFps),
            #[cfg(feature = "hardware-trigger")]
            13 => Ok(Order::ConfigureCamExposureTime),
            other => Err(UnknownOrder(other)),
        }
    }
}

impl TryFrom<i8> for Order {
    type Error = UnknownOrder;

    fn try_from(value: i8) -> Result<Self, UnknownOrder> {
        Order::try_from(value as u8)
    }
}

#[derive(Debug, EnumIter, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Light {
    Left,
    Right,
}

impl Light {
    pub fn pin(self) -> u8 {
        use crate::constants::{LEFT_LIGHT_PIN, RIGHT_LIGHT_PIN};
        match self {
            Light::Left => LEFT_LIGHT_PIN,
            Light::Right => RIGHT_LIGHT_PIN,
        }
    }
}

/// Ball motion as reported by the tracker, mapped onto the two lights.
#[derive(Debug, EnumIter, Clone, Copy, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum BallMovement {
    Stopped = 0,
    Moving = 1,
    RotatingLeft = 2,
    RotatingRight = 3,
}

impl BallMovement {
    /// Desired (left, right) light state.
    ///
    /// The single-light rig only used Moving (left on) and Stopped (left off).
    /// Driving the right light for RotatingRight, and switching it off for the
    /// other movements, extends that to a two-light rig.
    pub fn lights(self) -> (bool, bool) {
        match self {
            BallMovement::Stopped => (false, false),
            BallMovement::Moving | BallMovement::RotatingLeft => (true, false),
            BallMovement::RotatingRight => (false, true),
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct UnknownBallMovement(pub u8);

impl fmt::Display for UnknownBallMovement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown ball movement: {}", self.0)
    }
}

impl Error for UnknownBallMovement {}

impl TryFrom<u8> for BallMovement {
    type Error = UnknownBallMovement;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(BallMovement::Stopped),
            1 => Ok(BallMovement::Moving),
            2 => Ok(BallMovement::RotatingLeft),
            3 => Ok(BallMovement::RotatingRight),
            other => Err(UnknownBallMovement(other)),
        }
    }
}
