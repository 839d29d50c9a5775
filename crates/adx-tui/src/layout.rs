//! Screen layout
//!
//! Top to bottom: title, status bar, optional error banner, the mode's
//! body, progress lines, the log panel and one line of key hints. Only
//! the body stretches; everything else is sized to its content.

use ratatui::layout::{Constraint, Layout, Rect};

/// Screen areas for the main layout
#[derive(Debug, Clone, Copy)]
pub struct ScreenAreas {
    pub header: Rect,
    pub status: Rect,
    pub banner: Rect,
    pub body: Rect,
    pub progress: Rect,
    pub log: Rect,
    pub footer: Rect,
}

/// Heights of the content-sized sections
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sections {
    pub banner: bool,
    pub progress_lines: u16,
    /// Log panel height including its border, 0 to hide it
    pub log_height: u16,
}

/// Split `area` into the main screen sections
pub fn create(area: Rect, sections: Sections) -> ScreenAreas {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(u16::from(sections.banner)),
        Constraint::Min(3),
        Constraint::Length(sections.progress_lines),
        Constraint::Length(sections.log_height),
        Constraint::Length(1),
    ])
    .split(area);

    ScreenAreas {
        header: chunks[0],
        status: chunks[1],
        banner: chunks[2],
        body: chunks[3],
        progress: chunks[4],
        log: chunks[5],
        footer: chunks[6],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_layout_gives_body_the_rest() {
        let areas = create(Rect::new(0, 0, 80, 24), Sections::default());

        assert_eq!(areas.header.y, 0);
        assert_eq!(areas.status.y, 1);
        assert_eq!(areas.banner.height, 0);
        assert_eq!(areas.body.y, 2);
        assert_eq!(areas.body.height, 21);
        assert_eq!(areas.footer.y, 23);
    }

    #[test]
    fn test_sections_stack_below_body() {
        let sections = Sections {
            banner: true,
            progress_lines: 2,
            log_height: 7,
        };
        let areas = create(Rect::new(0, 0, 80, 24), sections);

        assert_eq!(areas.banner.height, 1);
        assert_eq!(areas.body.y, 3);
        assert_eq!(areas.body.height, 11);
        assert_eq!(areas.progress.y, 14);
        assert_eq!(areas.log.y, 16);
        assert_eq!(areas.log.height, 7);
        assert_eq!(areas.footer.y, 23);
    }

    #[test]
    fn test_areas_are_contiguous() {
        let area = Rect::new(0, 0, 100, 40);
        let areas = create(
            area,
            Sections {
                banner: true,
                progress_lines: 1,
                log_height: 4,
            },
        );

        let total = areas.header.height
            + areas.status.height
            + areas.banner.height
            + areas.body.height
            + areas.progress.height
            + areas.log.height
            + areas.footer.height;
        assert_eq!(total, area.height);
    }
}
