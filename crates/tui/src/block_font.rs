use std::collections::HashMap;

use once_cell::sync::Lazy;

const FONT_HEIGHT: usize = 5;
const FONT_WIDTH: usize = 5;
const LETTER_GAP: usize = 2;
const FILL_CHAR: char = '█';
const SHADOW_CHAR: char = '▒';

type Glyph = [&'static str; FONT_HEIGHT];

static GLYPHS: Lazy<HashMap<char, Glyph>> = Lazy::new(|| {
    HashMap::from([
        ('B', ["1111 ", "1   1", "1111 ", "1   1", "1111 "]),
        ('I', ["11111", "  1  ", "  1  ", "  1  ", "11111"]),
        ('N', ["1   1", "11  1", "1 1 1", "1  11", "1   1"]),
        ('G', [" 1111", "1    ", "1  11", "1   1", " 111 "]),
        ('O', [" 111 ", "1   1", "1   1", "1   1", " 111 "]),
        (' ', ["     ", "     ", "     ", "     ", "     "]),
    ])
});

/// Height in rows of any rendered banner, shadow included.
pub fn height() -> usize {
    FONT_HEIGHT + 1
}

/// Render `text` as block letters with a drop shadow. Unknown characters are skipped.
pub fn render(text: &str) -> Vec<String> {
    let glyphs: Vec<&Glyph> = text
        .chars()
        .filter_map(|ch| GLYPHS.get(&ch.to_ascii_uppercase()))
        .collect();
    if glyphs.is_empty() {
        return Vec::new();
    }

    let cell_width = FONT_WIDTH * 2 + LETTER_GAP;
    let width = glyphs.len() * cell_width + 1;
    let mut canvas = vec![vec![' '; width]; height()];

    for (index, glyph) in glyphs.iter().enumerate() {
        let x_offset = index * cell_width;
        for (row, pattern) in glyph.iter().enumerate() {
            for (col, symbol) in pattern.chars().enumerate() {
                if symbol == '1' {
                    let x = x_offset + col * 2;
                    fill(&mut canvas, row, x);
                }
            }
        }
    }

    canvas
        .into_iter()
        .map(|row| row.into_iter().collect::<String>().trim_end().to_string())
        .collect()
}

fn fill(canvas: &mut [Vec<char>], y: usize, x: usize) {
    for dx in 0..2 {
        place(canvas, y + 1, x + dx + 1, SHADOW_CHAR);
    }
    for dx in 0..2 {
        canvas[y][x + dx] = FILL_CHAR;
    }
}

fn place(canvas: &mut [Vec<char>], y: usize, x: usize, ch: char) {
    if let Some(cell) = canvas.get_mut(y).and_then(|row| row.get_mut(x)) {
        if *cell == ' ' {
            *cell = ch;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_bingo_banner() {
        let lines = render("bingo");
        assert_eq!(lines.len(), height());
        assert!(lines[0].starts_with("████████"));
        assert!(lines.iter().any(|line| line.contains(SHADOW_CHAR)));
    }

    #[test]
    fn unknown_characters_render_nothing() {
        assert!(render("xyz").is_empty());
    }
}
