/// Identifies one of the two vertically scrolling panes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Grid,
    Chart,
}

impl Pane {
    fn index(self) -> usize {
        match self {
            Pane::Grid => 0,
            Pane::Chart => 1,
        }
    }

    fn other(self) -> Pane {
        match self {
            Pane::Grid => Pane::Chart,
            Pane::Chart => Pane::Grid,
        }
    }
}

/// Mirrors the vertical scroll offset between the grid and chart panes.
///
/// Whichever pane the user scrolls becomes the leader; the other pane gets
/// a one-shot override to match. A pane that consumed an override is
/// latched for that frame so its echoed (possibly clamped) offset is not
/// read back as user input. Without the latch the two panes would re-push
/// offsets at each other indefinitely.
#[derive(Debug, Default)]
pub struct ScrollSync {
    offset: f32,
    pending: [Option<f32>; 2],
    forced: [bool; 2],
}

impl ScrollSync {
    /// Offset this pane must adopt because the other pane scrolled.
    pub fn take_override(&mut self, pane: Pane) -> Option<f32> {
        let value = self.pending[pane.index()].take();
        if value.is_some() {
            self.forced[pane.index()] = true;
        }
        value
    }

    /// Record where the pane actually ended up this frame.
    pub fn report(&mut self, pane: Pane, offset: f32) {
        if self.forced[pane.index()] {
            self.forced[pane.index()] = false;
            return;
        }
        if offset != self.offset {
            self.offset = offset;
            self.pending[pane.other().index()] = Some(offset);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_scroll_pushes_to_other_pane() {
        let mut sync = ScrollSync::default();
        assert_eq!(sync.take_override(Pane::Grid), None);
        sync.report(Pane::Grid, 120.0);
        assert_eq!(sync.take_override(Pane::Chart), Some(120.0));
        sync.report(Pane::Chart, 120.0);
        // The mirrored offset must not bounce back.
        assert_eq!(sync.take_override(Pane::Grid), None);
    }

    #[test]
    fn test_clamped_follower_does_not_drag_leader_back() {
        let mut sync = ScrollSync::default();
        sync.report(Pane::Grid, 500.0);
        assert_eq!(sync.take_override(Pane::Chart), Some(500.0));
        // Chart content is shorter and clamps the forced offset.
        sync.report(Pane::Chart, 320.0);
        assert_eq!(sync.take_override(Pane::Grid), None);
    }

    #[test]
    fn test_chart_leads_symmetrically() {
        let mut sync = ScrollSync::default();
        sync.report(Pane::Chart, 80.0);
        assert_eq!(sync.take_override(Pane::Grid), Some(80.0));
        assert_eq!(sync.take_override(Pane::Chart), None);
    }

    #[test]
    fn test_steady_state_stays_quiet() {
        let mut sync = ScrollSync::default();
        sync.report(Pane::Grid, 64.0);
        let _ = sync.take_override(Pane::Chart);
        sync.report(Pane::Chart, 64.0);
        for _ in 0..3 {
            sync.report(Pane::Grid, 64.0);
            sync.report(Pane::Chart, 64.0);
            assert_eq!(sync.take_override(Pane::Grid), None);
            assert_eq!(sync.take_override(Pane::Chart), None);
        }
    }
}
