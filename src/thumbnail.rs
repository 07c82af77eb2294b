//! Generates the decorative SVG thumbnail shown next to an article. The
//! category picks the palette and the identifier picks the arrangement, so a
//! given article always gets the same image and articles in the same category
//! look related.

const WIDTH: u32 = 1200;
const HEIGHT: u32 = 630;
const SHAPES: usize = 6;

/// Background, primary and accent colors.
const PALETTES: [[&str; 3]; 6] = [
    ["#0f172a", "#38bdf8", "#f472b6"],
    ["#1c1917", "#f59e0b", "#84cc16"],
    ["#042f2e", "#2dd4bf", "#facc15"],
    ["#1e1b4b", "#a78bfa", "#fb7185"],
    ["#431407", "#fb923c", "#fde68a"],
    ["#052e16", "#4ade80", "#22d3ee"],
];

/// An SVG image derived from an article.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Thumbnail(String);

impl Thumbnail {
    /// Generates the thumbnail for an article with the given identifier and
    /// category. The output depends only on its arguments.
    pub fn generate(identifier: &str, category: &str) -> Thumbnail {
        let palette = palette(category);
        let mut dice = Dice::new(identifier);

        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}"><rect width="{w}" height="{h}" fill="{bg}"/>"#,
            w = WIDTH,
            h = HEIGHT,
            bg = palette[0],
        );
        for i in 0..SHAPES {
            svg.push_str(&shape(&mut dice, palette[1 + i % 2]));
        }
        svg.push_str("</svg>");
        Thumbnail(svg)
    }

    /// The SVG markup.
    pub fn svg(&self) -> &str {
        &self.0
    }

    /// The thumbnail as a `data:` URI suitable for an `<img src>` attribute.
    pub fn data_uri(&self) -> String {
        format!(
            "data:image/svg+xml;charset=utf-8,{}",
            urlencoding::encode(&self.0)
        )
    }
}

fn palette(category: &str) -> &'static [&'static str; 3] {
    let digest = blake3::hash(category.as_bytes());
    &PALETTES[usize::from(digest.as_bytes()[0]) % PALETTES.len()]
}

fn shape(dice: &mut Dice, fill: &str) -> String {
    let opacity = 25 + dice.below(50);
    match dice.below(3) {
        0 => format!(
            r#"<circle cx="{}" cy="{}" r="{}" fill="{}" fill-opacity="0.{:02}"/>"#,
            dice.below(WIDTH),
            dice.below(HEIGHT),
            40 + dice.below(200),
            fill,
            opacity,
        ),
        1 => format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}" fill="{}" fill-opacity="0.{:02}" transform="rotate({} {} {})"/>"#,
            dice.below(WIDTH),
            dice.below(HEIGHT),
            60 + dice.below(300),
            60 + dice.below(200),
            dice.below(40),
            fill,
            opacity,
            dice.below(90),
            WIDTH / 2,
            HEIGHT / 2,
        ),
        _ => format!(
            r#"<polygon points="{},{} {},{} {},{}" fill="{}" fill-opacity="0.{:02}"/>"#,
            dice.below(WIDTH),
            dice.below(HEIGHT),
            dice.below(WIDTH),
            dice.below(HEIGHT),
            dice.below(WIDTH),
            dice.below(HEIGHT),
            fill,
            opacity,
        ),
    }
}

/// Draws shape parameters from the BLAKE3 output stream of a key.
struct Dice(blake3::OutputReader);

impl Dice {
    fn new(key: &str) -> Dice {
        let mut hasher = blake3::Hasher::new();
        hasher.update(key.as_bytes());
        Dice(hasher.finalize_xof())
    }

    fn below(&mut self, bound: u32) -> u32 {
        let mut bytes = [0u8; 4];
        self.0.fill(&mut bytes);
        u32::from_le_bytes(bytes) % bound
    }
}
