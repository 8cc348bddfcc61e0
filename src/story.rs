//! The carousel: four slides in a fixed order with their narrative text.

use crate::dataset::Assets;
use crate::error::Result;
use crate::gate::LoadRequest;
use crate::loader::load_indicator_table;
use crate::render::Rendered;
use crate::slides::{Command, GoalSlide, IndicatorSlide, OverviewSlide, ProfileSlide, Slide};
use tracing::debug;

pub struct Page {
    pub heading: &'static str,
    pub narrative: &'static str,
    pub slide: Box<dyn Slide>,
}

pub struct Story {
    pages: Vec<Page>,
    current: usize,
}

impl Story {
    /// Build every slide from the loaded assets. Slides that need extra
    /// files return their first request; the caller resolves them through
    /// [`Story::resolve`].
    pub fn new(assets: &Assets) -> (Self, Vec<(usize, LoadRequest)>) {
        let mut pages = vec![
            Page {
                heading: "Performance of States and UTs on SDGs",
                narrative: "Snapshot of how each State and UT performed across all 17 SDGs, \
                            with performance levels color-coded from Aspirant to Achiever.",
                slide: Box::new(OverviewSlide::new(assets)),
            },
            Page {
                heading: "Zooming In: State/UT Profiles",
                narrative: "Detailed SDG-wise performance and composite score for each State \
                            and UT, helping identify progress made and areas requiring greater focus.",
                slide: Box::new(ProfileSlide::new(assets)),
            },
            Page {
                heading: "A Closer Look at Progress on Individual SDGs",
                narrative: "Visualisation of State/UT performance on a specific SDG, highlighting \
                            regional disparities and emerging trends across the country.",
                slide: Box::new(GoalSlide::new(assets)),
            },
            Page {
                heading: "Exploring the Indicators Behind the SDG Index",
                narrative: "Indicator-wise performance of each State and UT offers a granular view \
                            of what drives goal-level scores, helping pinpoint strengths, weaknesses, \
                            and data-driven priorities.",
                slide: Box::new(IndicatorSlide::new(assets)),
            },
        ];
        let requests = pages
            .iter_mut()
            .enumerate()
            .filter_map(|(i, p)| p.slide.initial_load(assets).map(|r| (i, r)))
            .collect();
        (Story { pages, current: 0 }, requests)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn position(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> &Page {
        &self.pages[self.current]
    }

    pub fn next(&mut self) -> bool {
        if self.current + 1 < self.pages.len() {
            self.current += 1;
            true
        } else {
            false
        }
    }

    pub fn previous(&mut self) -> bool {
        if self.current > 0 {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    /// Apply a control change to the current slide.
    pub fn apply(&mut self, cmd: Command, assets: &Assets) -> Result<Option<(usize, LoadRequest)>> {
        let idx = self.current;
        let req = self.pages[idx].slide.apply(cmd, assets)?;
        Ok(req.map(|r| (idx, r)))
    }

    /// Load the file behind `req` and hand it to the slide that asked.
    /// Returns false when the slide had already moved on.
    pub fn resolve(&mut self, page: usize, req: LoadRequest, assets: &Assets) -> bool {
        debug!(page, key = %req.key, "resolving load");
        let result = load_indicator_table(&req.path, &req.key);
        match self.pages.get_mut(page) {
            Some(p) => p.slide.complete_load(req.ticket, result, assets),
            None => false,
        }
    }

    pub fn render(&self, assets: &Assets) -> Rendered {
        self.current().slide.render(assets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slides::{fixtures, View};

    #[test]
    fn navigation_clamps_at_both_ends() {
        let assets = fixtures::assets();
        let (mut story, requests) = Story::new(&assets);
        assert_eq!(story.len(), 4);
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0, 3);
        assert!(!story.previous());
        while story.next() {}
        assert_eq!(story.position(), 3);
        assert_eq!(story.current().slide.index(), 4);
        assert!(!story.next());
    }

    #[test]
    fn missing_indicator_file_fails_visibly() {
        let assets = fixtures::assets();
        let (mut story, requests) = Story::new(&assets);
        for (page, req) in requests {
            assert!(story.resolve(page, req, &assets));
        }
        while story.next() {}
        assert!(matches!(story.render(&assets), Rendered::Failed { .. }));
    }

    #[test]
    fn commands_go_to_current_slide_only() {
        let assets = fixtures::assets();
        let (mut story, _) = Story::new(&assets);
        story.next();
        story.apply(Command::View(View::Table), &assets).unwrap();
        assert_eq!(story.current().slide.view(), View::Table);
        story.previous();
        assert_eq!(story.current().slide.view(), View::Chart);
    }
}
