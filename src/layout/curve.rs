//! Turtle path tracing a Hilbert curve (variant II), built by string rewriting.
//!
//! The path alphabet is `F` (forward), `+` (turn clockwise, then forward)
//! and `-` (turn anticlockwise, then forward).

/// Straight runs of `n > 1` forwards become `STRETCH_FACTOR * n + 2` forwards.
pub const STRETCH_FACTOR: usize = 5;

const AXIOM: &str = "X";
const RULE_X: &str = "XFYFX+F+YFXFY-F-XFYFX";
const RULE_Y: &str = "YFXFY-F-XFYFX+F+YFXFY";

fn rewrite(path: &str) -> String {
    let mut next = String::with_capacity(path.len() * RULE_X.len());
    for c in path.chars() {
        match c {
            'X' => next.push_str(RULE_X),
            'Y' => next.push_str(RULE_Y),
            other => next.push(other),
        }
    }
    next
}

/// Generate the stretched path of the curve after `iterations` rewrites.
///
/// Zero iterations yield the empty path.
pub fn generate(iterations: u32) -> String {
    if iterations == 0 {
        return String::new();
    }
    let mut path = AXIOM.to_string();
    for _ in 0..iterations {
        path = rewrite(&path);
    }
    path.retain(|c| c != 'X' && c != 'Y');
    stretch(&path)
}

/// Stretch every maximal run of `n > 1` forwards to `STRETCH_FACTOR * n + 2`.
///
/// Single forwards stay as they are, as do turns.
pub fn stretch(path: &str) -> String {
    let mut stretched = String::with_capacity(path.len() * STRETCH_FACTOR);
    let mut run = 0;
    for c in path.chars() {
        if c == 'F' {
            run += 1;
            continue;
        }
        push_run(&mut stretched, run);
        stretched.push(c);
        run = 0;
    }
    push_run(&mut stretched, run);
    stretched
}

fn push_run(path: &mut String, run: usize) {
    let length = match run {
        0 => return,
        1 => 1,
        n => STRETCH_FACTOR * n + 2,
    };
    path.extend(std::iter::repeat('F').take(length));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn forwards(n: usize) -> String {
        "F".repeat(n)
    }

    #[test]
    fn test_stretch() {
        assert_eq!(stretch("FFF+F+"), format!("{}+F+", forwards(17)));
        assert_eq!(stretch("F+F-F"), "F+F-F");
        assert_eq!(stretch("FF"), forwards(12));
        assert_eq!(
            stretch("FF-F-FFFF"),
            format!("{}-F-{}", forwards(12), forwards(22))
        );
        assert_eq!(stretch(""), "");
    }

    #[test]
    fn test_stretch_runs_of_one_are_fixed_points() {
        let path = "F+F+F-F";
        assert_eq!(stretch(&stretch(path)), path);
    }

    #[test]
    fn test_generate_empty() {
        assert_eq!(generate(0), "");
    }

    #[test]
    fn test_generate_first_iteration() {
        let expected = format!("{}+F+{}-F-{}", forwards(12), forwards(12), forwards(12));
        assert_eq!(generate(1), expected);
    }

    #[test]
    fn test_generate_alphabet_and_growth() {
        let mut previous = 0;
        for iterations in 1..=3 {
            let path = generate(iterations);
            assert!(path.chars().all(|c| matches!(c, 'F' | '+' | '-')));
            assert!(path.len() > previous);
            previous = path.len();
        }
    }

    #[test]
    fn test_generate_is_a_closed_walk_free_of_overlaps() {
        // Walk the second iteration and check no cell is visited twice.
        let path = generate(2);
        let mut visited = std::collections::HashSet::new();
        let (mut x, mut y, mut dx, mut dy) = (0i64, 0i64, 1i64, 0i64);
        visited.insert((x, y));
        for c in path.chars() {
            match c {
                '+' => (dx, dy) = (-dy, dx),
                '-' => (dx, dy) = (dy, -dx),
                _ => {}
            }
            x += dx;
            y += dy;
            assert!(visited.insert((x, y)), "revisited ({}, {})", x, y);
        }
    }
}
