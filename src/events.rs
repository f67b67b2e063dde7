// Accelink - Sensor Data Types

// ---------------------------------------------------------------------------
// Raw register burst (OUT_X_MSB .. OUT_Z_LSB)
// ---------------------------------------------------------------------------
pub const RAW_FRAME_LEN: usize = 6;

/// X-MSB, X-LSB, Y-MSB, Y-LSB, Z-MSB, Z-LSB as read from the data registers.
pub type RawFrame = [u8; RAW_FRAME_LEN];

// ---------------------------------------------------------------------------
// Acceleration sample (m/s²)
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Sample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Sample {
    /// Axis values in acquisition order.
    pub fn axes(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

// ---------------------------------------------------------------------------
// Portrait / landscape classification
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    #[default]
    PortraitUp,
    PortraitDown,
    LandscapeRight,
    LandscapeLeft,
}

impl Position {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::PortraitUp     => "Portrait Up",
            Self::PortraitDown   => "Portrait Down",
            Self::LandscapeRight => "Landscape Right",
            Self::LandscapeLeft  => "Landscape Left",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Face {
    #[default]
    Front,
    Back,
}

impl Face {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Front => "Front",
            Self::Back  => "Back",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrientationStatus {
    pub position: Position,
    pub face: Face,
}

impl std::fmt::Display for OrientationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.position.display_name(), self.face.display_name())
    }
}
