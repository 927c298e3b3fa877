//! Toroidal grid geometry and the dense substance field.

/// Periodic 2D geometry shared by the field, occupancy and sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Torus {
    pub width: usize,
    pub height: usize,
}

impl Torus {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Normalizes signed coordinates into range by wrapping modulo the
    /// grid dimensions.
    #[inline]
    pub fn wrap(&self, x: i64, y: i64) -> (usize, usize) {
        (
            x.rem_euclid(self.width as i64) as usize,
            y.rem_euclid(self.height as i64) as usize,
        )
    }

    /// Row-major cell index for in-range coordinates.
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y * self.width + x
    }

    /// The 8 wrapped Moore neighbours of a cell.
    pub fn moore(&self, x: usize, y: usize) -> [(usize, usize); 8] {
        let mut out = [(0usize, 0usize); 8];
        let mut n = 0;
        for dy in -1i64..=1 {
            for dx in -1i64..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                out[n] = self.wrap(x as i64 + dx, y as i64 + dy);
                n += 1;
            }
        }
        out
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }
}

/// Dense w×h×S concentration grid.
///
/// Values are intentionally not clamped at zero: metabolism subtracts
/// with floating-point arithmetic and a cell may go transiently
/// negative. Diffusion always reads the previous-tick snapshot, never
/// partially updated cells.
#[derive(Debug, Clone)]
pub struct SubstanceField {
    torus: Torus,
    substances: usize,
    cells: Vec<f32>,
    scratch: Vec<f32>,
}

impl SubstanceField {
    pub fn new(torus: Torus, substances: usize) -> Self {
        let len = torus.cell_count() * substances;
        Self {
            torus,
            substances,
            cells: vec![0.0; len],
            scratch: vec![0.0; len],
        }
    }

    pub fn torus(&self) -> Torus {
        self.torus
    }

    pub fn substances(&self) -> usize {
        self.substances
    }

    #[inline]
    fn idx(&self, x: usize, y: usize, s: usize) -> usize {
        debug_assert!(s < self.substances);
        self.torus.index(x, y) * self.substances + s
    }

    /// Concentration at wrapped coordinates.
    #[inline]
    pub fn get(&self, x: i64, y: i64, s: usize) -> f32 {
        let (x, y) = self.torus.wrap(x, y);
        self.cells[self.idx(x, y, s)]
    }

    /// Adds `amount` (which may be negative) at wrapped coordinates.
    #[inline]
    pub fn add(&mut self, x: i64, y: i64, s: usize, amount: f32) {
        let (x, y) = self.torus.wrap(x, y);
        let i = self.idx(x, y, s);
        self.cells[i] += amount;
    }

    /// Resets every cell to zero.
    pub fn clear(&mut self) {
        self.cells.fill(0.0);
    }

    /// One diffusion/decay step over the whole grid.
    ///
    /// Each cell moves toward the mean of its 8 Moore neighbours by
    /// `diffusion`, then the whole field is scaled by `decay`. The
    /// neighbour means are computed from the pre-step field, so the
    /// update order cannot bleed into the stencil.
    pub fn diffuse(&mut self, diffusion: f32, decay: f32) {
        let keep = 1.0 - diffusion;
        for y in 0..self.torus.height {
            for x in 0..self.torus.width {
                let neighbours = self.torus.moore(x, y);
                for s in 0..self.substances {
                    let mut sum = 0.0f32;
                    for &(nx, ny) in &neighbours {
                        sum += self.cells[self.idx(nx, ny, s)];
                    }
                    let mean = sum / 8.0;
                    let i = self.idx(x, y, s);
                    self.scratch[i] = (keep * self.cells[i] + diffusion * mean) * decay;
                }
            }
        }
        std::mem::swap(&mut self.cells, &mut self.scratch);
    }

    /// Total amount of one substance over the grid.
    pub fn total(&self, s: usize) -> f64 {
        let mut sum = 0.0f64;
        for y in 0..self.torus.height {
            for x in 0..self.torus.width {
                sum += self.cells[self.idx(x, y, s)] as f64;
            }
        }
        sum
    }

    /// Per-substance totals, for logging and determinism checks.
    pub fn totals(&self) -> Vec<f64> {
        (0..self.substances).map(|s| self.total(s)).collect()
    }
}
