//! Wire identifier tables and the value shapes of data components.

macro_rules! wire_ids {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident = $value:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        pub enum $name {
            $($(#[$vmeta])* $variant = $value,)+
        }

        impl $name {
            /// Every known identifier, in ascending wire order.
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            /// The identifier byte as sent on the wire.
            pub const fn as_u8(self) -> u8 {
                self as u8
            }

            /// Look up an identifier byte; `None` if it is not known.
            pub const fn from_u8(value: u8) -> Option<Self> {
                match value {
                    $($value => Some($name::$variant),)+
                    _ => None,
                }
            }

            pub const fn name(self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant),)+
                }
            }
        }

        impl TryFrom<u8> for $name {
            type Error = u8;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                Self::from_u8(value).ok_or(value)
            }
        }

        impl From<$name> for u8 {
            fn from(id: $name) -> u8 {
                id.as_u8()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

wire_ids! {
    /// Frame identifiers understood by the device.
    pub enum FrameId {
        /// Query device type and firmware revision.
        GetModInfo = 1,
        GetModInfoResp = 2,
        /// Select the components returned in data frames.
        SetDataComponents = 3,
        /// Request one data set (polled acquisition mode).
        GetData = 4,
        GetDataResp = 5,
        SetConfig = 6,
        GetConfig = 7,
        GetConfigResp = 8,
        /// Persist the current configuration to non-volatile memory.
        Save = 9,
        StartCal = 10,
        StopCal = 11,
        SetFirFilters = 12,
        GetFirFilters = 13,
        GetFirFiltersResp = 14,
        PowerDown = 15,
        SaveDone = 16,
        UserCalSampleCount = 17,
        UserCalScore = 18,
        SetConfigDone = 19,
        SetFirFiltersDone = 20,
        /// Begin streaming data sets at the configured sample delay.
        StartContinuousMode = 21,
        StopContinuousMode = 22,
        PowerUpDone = 23,
        SetAcqParams = 24,
        GetAcqParams = 25,
        SetAcqParamsDone = 26,
        GetAcqParamsResp = 27,
        PowerDownDone = 28,
        FactoryMagCoeff = 29,
        FactoryMagCoeffDone = 30,
        TakeUserCalSample = 31,
        FactoryAccelCoeff = 36,
        FactoryAccelCoeffDone = 37,
        CopyCoeffSet = 43,
        CopyCoeffSetDone = 44,
        SerialNumber = 52,
        SerialNumberResp = 53,
        SetFunctionalMode = 79,
        GetFunctionalMode = 80,
        GetFunctionalModeResp = 81,
        SetDistortMode = 107,
        GetDistortMode = 108,
        GetDistortModeResp = 109,
        SetResetRef = 110,
        SetMagTruthMethod = 119,
        GetMagTruthMethod = 120,
        GetMagTruthMethodResp = 121,
        SetMergeRate = 128,
        GetMergeRate = 129,
        GetMergeRateResp = 130,
    }
}

wire_ids! {
    /// Configuration identifiers used by `SetConfig` / `GetConfig`.
    pub enum ConfigId {
        /// Magnetic declination in degrees, float32.
        Declination = 1,
        TrueNorth = 2,
        BigEndian = 6,
        MountingRef = 10,
        UserCalNumPoints = 12,
        UserCalAutoSampling = 13,
        BaudRate = 14,
        /// Output units in mils instead of degrees.
        MilOut = 15,
        HprDuringCal = 16,
        MagCoeffSet = 18,
        AccelCoeffSet = 19,
    }
}

wire_ids! {
    /// Rate identifiers used by `SetMergeRate` / `GetMergeRate`.
    pub enum RateId {
        MergeRate = 5,
        MagRate = 6,
    }
}

wire_ids! {
    /// Calibration procedures selectable with `StartCal`.
    pub enum CalOption {
        FullRangeCal = 10,
        /// Heading-plane calibration only.
        TwoDCal = 20,
        /// Hard-iron only.
        HiOnlyCal = 30,
        LimitedTiltCal = 40,
        AccelCalOnly = 100,
        AccelCalWithMag = 110,
    }
}

wire_ids! {
    /// Sensor readings that can appear in a data frame.
    pub enum ComponentId {
        /// Compass heading, degrees in [0, 360).
        Heading = 5,
        /// Internal temperature, degrees Celsius.
        Temperature = 7,
        /// Set when a magnetometer axis reads beyond ±125 µT.
        Distortion = 8,
        /// User calibration status flag.
        CalStatus = 9,
        AccelX = 21,
        AccelY = 22,
        AccelZ = 23,
        Pitch = 24,
        Roll = 25,
        MagX = 27,
        MagY = 28,
        MagZ = 29,
        GyroX = 74,
        GyroY = 75,
        GyroZ = 76,
        /// Q0..Q3, Q3 being the scalar part.
        Quaternion = 77,
        /// Heading uncertainty class: 1 (<2°), 2 (2°-10°), 3 (>10°).
        HeadingStatus = 79,
    }
}

/// Shape of a component's value block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    /// One unsigned byte.
    Status,
    /// One float32.
    Scalar,
    /// Four float32.
    Quaternion,
}

impl ComponentKind {
    pub const fn value_width(self) -> usize {
        match self {
            ComponentKind::Status => 1,
            ComponentKind::Scalar => 4,
            ComponentKind::Quaternion => 16,
        }
    }
}

impl ComponentId {
    pub const fn kind(self) -> ComponentKind {
        match self {
            ComponentId::Distortion | ComponentId::CalStatus | ComponentId::HeadingStatus => {
                ComponentKind::Status
            }
            ComponentId::Quaternion => ComponentKind::Quaternion,
            _ => ComponentKind::Scalar,
        }
    }

    /// Bytes following the id byte inside a data frame.
    pub const fn value_width(self) -> usize {
        self.kind().value_width()
    }
}
