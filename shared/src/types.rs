pub type Tick = u32;
pub type PeerId = u32;
pub type OpId = u16;
