pub mod kundli;
pub mod location;
pub mod nakshatra;
pub mod zodiac;

pub use kundli::*;
pub use location::*;
pub use nakshatra::*;
pub use zodiac::*;
