//! Per-session render state: the current draw mode and the overlay
//! toggles. Mutated by discrete user actions, read once per frame by
//! the render engine, and alive for the whole viewing session.

/// How scene meshes are rasterized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    Shaded,
    Wireframe,
    Points,
}

impl DrawMode {
    /// The next mode in the fixed cycle
    /// Shaded -> Wireframe -> Points -> Shaded.
    pub fn cycled(self) -> Self {
        match self {
            DrawMode::Shaded => DrawMode::Wireframe,
            DrawMode::Wireframe => DrawMode::Points,
            DrawMode::Points => DrawMode::Shaded,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DrawMode::Shaded => "shaded",
            DrawMode::Wireframe => "wireframe",
            DrawMode::Points => "points",
        }
    }
}

/// Draw mode plus the independent overlay toggles. Lighting is
/// orthogonal to the draw mode: shaded rendering with lighting off
/// falls back to flat unlit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderState {
    pub draw_mode: DrawMode,
    pub show_grid: bool,
    pub show_axes: bool,
    pub lighting: bool,
}

impl RenderState {
    pub fn new() -> Self {
        Self {
            draw_mode: DrawMode::Shaded,
            show_grid: true,
            show_axes: true,
            lighting: true,
        }
    }

    pub fn cycle_draw_mode(&mut self) {
        self.draw_mode = self.draw_mode.cycled();
    }

    pub fn toggle_grid(&mut self) {
        self.show_grid = !self.show_grid;
    }

    pub fn toggle_axes(&mut self) {
        self.show_axes = !self.show_axes;
    }

    pub fn toggle_lighting(&mut self) {
        self.lighting = !self.lighting;
    }
}

impl Default for RenderState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycling_three_times_returns_to_start() {
        let mut state = RenderState::new();
        let original = state.draw_mode;
        for _ in 0..3 {
            state.cycle_draw_mode();
        }
        assert_eq!(state.draw_mode, original);
    }

    #[test]
    fn n_cycles_equals_n_mod_three() {
        for n in 0..10usize {
            let mut stepped = RenderState::new();
            for _ in 0..n {
                stepped.cycle_draw_mode();
            }
            let mut reduced = RenderState::new();
            for _ in 0..(n % 3) {
                reduced.cycle_draw_mode();
            }
            assert_eq!(stepped.draw_mode, reduced.draw_mode);
        }
    }

    #[test]
    fn toggles_are_independent_of_draw_mode() {
        let mut state = RenderState::new();
        state.cycle_draw_mode();
        let mode = state.draw_mode;

        state.toggle_grid();
        state.toggle_axes();
        state.toggle_lighting();
        assert_eq!(state.draw_mode, mode);
        assert!(!state.show_grid);
        assert!(!state.show_axes);
        assert!(!state.lighting);

        state.toggle_lighting();
        assert!(state.lighting);
        assert!(!state.show_grid);
    }
}
