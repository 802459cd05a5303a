//! Condition-code, wind-speed and wind-bearing lookup tables.
//!
//! Glyphs are code points of the Weather Icons font.

/// Weather Icons glyphs used by the widget.
pub mod glyph {
    pub const CELSIUS: char = '\u{f03c}';
    pub const FAHRENHEIT: char = '\u{f045}';
    pub const SUNRISE: char = '\u{f051}';
    pub const SUNSET: char = '\u{f052}';
    pub const HUMIDITY: char = '\u{f07a}';
    pub const MAX_TEMP: char = '\u{f055}';
    pub const MIN_TEMP: char = '\u{f053}';
    pub const BAROMETER: char = '\u{f079}';

    pub const SUNNY_DAY: char = '\u{f00d}';
    pub const CLOUDY_DAY: char = '\u{f002}';
    pub const CLOUDY: char = '\u{f013}';
    pub const CLOUDY_WINDY: char = '\u{f012}';
    pub const SHOWERS: char = '\u{f01a}';
    pub const RAIN: char = '\u{f019}';
    pub const THUNDERSTORM: char = '\u{f01e}';
    pub const SNOW: char = '\u{f01b}';
    pub const FOG: char = '\u{f014}';
    pub const CLOUDY_NIGHT: char = '\u{f031}';
    pub const SHOWERS_NIGHT: char = '\u{f037}';
    pub const RAIN_NIGHT: char = '\u{f036}';
    pub const THUNDERSTORM_NIGHT: char = '\u{f02d}';
    pub const SNOW_NIGHT: char = '\u{f038}';
    pub const CLOUDY_WINDY_NIGHT: char = '\u{f023}';
    pub const ALIEN: char = '\u{f075}';
}

/// Map an OpenWeatherMap icon code (`01d` … `50n`) to a glyph.
///
/// Unknown codes map to [`glyph::ALIEN`].
pub fn condition_glyph(code: &str) -> char {
    match code {
        "01d" => glyph::SUNNY_DAY,
        "02d" => glyph::CLOUDY_DAY,
        "03d" => glyph::CLOUDY,
        "04d" => glyph::CLOUDY_WINDY,
        "09d" => glyph::SHOWERS,
        "10d" => glyph::RAIN,
        "11d" => glyph::THUNDERSTORM,
        "13d" => glyph::SNOW,
        "50d" => glyph::FOG,
        "01n" | "02n" | "03n" | "04n" => glyph::CLOUDY_NIGHT,
        "09n" => glyph::SHOWERS_NIGHT,
        "10n" => glyph::RAIN_NIGHT,
        "11n" => glyph::THUNDERSTORM_NIGHT,
        "13n" => glyph::SNOW_NIGHT,
        "50n" => glyph::CLOUDY_WINDY_NIGHT,
        _ => glyph::ALIEN,
    }
}

/// Beaufort wind force, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Beaufort {
    Calm,
    LightAir,
    LightBreeze,
    GentleBreeze,
    ModerateBreeze,
    FreshBreeze,
    StrongBreeze,
    NearGale,
    Gale,
    SevereGale,
    Storm,
    ViolentStorm,
    Hurricane,
}

/// Inclusive upper bounds in m/s from light air up to violent storm.
const BEAUFORT_LADDER: [(f64, Beaufort); 11] = [
    (1.5, Beaufort::LightAir),
    (3.3, Beaufort::LightBreeze),
    (5.5, Beaufort::GentleBreeze),
    (7.9, Beaufort::ModerateBreeze),
    (10.7, Beaufort::FreshBreeze),
    (13.8, Beaufort::StrongBreeze),
    (17.1, Beaufort::NearGale),
    (20.7, Beaufort::Gale),
    (24.4, Beaufort::SevereGale),
    (28.4, Beaufort::Storm),
    (32.6, Beaufort::ViolentStorm),
];

impl Beaufort {
    /// Classify a wind speed in metres per second.
    ///
    /// Calm is strictly below 0.3 m/s; every other bound is inclusive.
    pub fn from_mps(speed: f64) -> Self {
        if speed < 0.3 {
            return Self::Calm;
        }
        BEAUFORT_LADDER
            .iter()
            .find(|(upper, _)| speed <= *upper)
            .map_or(Self::Hurricane, |(_, force)| *force)
    }

    pub fn phrase(self) -> &'static str {
        match self {
            Self::Calm => "Calm",
            Self::LightAir => "Light air",
            Self::LightBreeze => "Light breeze",
            Self::GentleBreeze => "Gentle breeze",
            Self::ModerateBreeze => "Moderate breeze",
            Self::FreshBreeze => "Fresh breeze",
            Self::StrongBreeze => "Strong breeze",
            Self::NearGale => "Near gale",
            Self::Gale => "Gale",
            Self::SevereGale => "Severe gale",
            Self::Storm => "Storm",
            Self::ViolentStorm => "Violent storm",
            Self::Hurricane => "Hurricane",
        }
    }

    /// Whether the wind is too weak for a direction to mean anything.
    pub fn is_directionless(self) -> bool {
        matches!(self, Self::Calm | Self::LightAir)
    }
}

/// Sixteen compass points, clockwise from north.
pub const CARDINALS: [&str; 16] = [
    "north",
    "north north east",
    "north east",
    "east north east",
    "east",
    "east south east",
    "south east",
    "south south east",
    "south",
    "south south west",
    "south west",
    "west south west",
    "west",
    "west north west",
    "north west",
    "north north west",
];

/// Map a bearing in degrees to one of the sixteen [`CARDINALS`].
///
/// Sectors are 22.5° wide and centred on each point, with upper bounds
/// inclusive: `(11.25, 33.75]` is north north east, and anything at or below
/// 11.25° or above 348.75° is north.
pub fn cardinal(bearing: f64) -> &'static str {
    let deg = bearing.rem_euclid(360.0);
    if deg <= 11.25 {
        return CARDINALS[0];
    }
    // Upper bound of sector i (i >= 1) is 11.25 + 22.5 * i.
    (1..CARDINALS.len())
        .find(|&i| deg <= 11.25 + 22.5 * i as f64)
        .map_or(CARDINALS[0], |i| CARDINALS[i])
}

/// Compose the wind line, e.g. `"Gentle breeze from the south south west"`.
///
/// Direction is dropped for calm and light air.
pub fn wind_description(speed: f64, bearing: f64) -> String {
    let force = Beaufort::from_mps(speed);
    if force.is_directionless() {
        force.phrase().to_string()
    } else {
        format!("{} from the {}", force.phrase(), cardinal(bearing))
    }
}
