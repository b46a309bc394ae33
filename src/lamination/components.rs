//! Counting the components of a multicurve without tracing its strands.
//!
//! Number the strands crossing the edges consecutively, edge by edge. Each
//! corner of each triangle pairs a run of strands on one edge with a run on
//! the next edge, either keeping or reversing their order. Components are
//! the orbits of these interval pairings, and the orbits are counted by
//! cutting the number line down from the top:
//! - points above every pairing are orbits on their own;
//! - the pairing reaching the top with the lowest range start is then
//!   either folded modulo its period (it overlaps its own domain), or every
//!   interval above its range start is pushed back through it.
//!
//! Each round removes the top of the line or splits one reflection, and
//! folding makes long runs of small shifts cost one round. The number of
//! rounds depends on the number of pairings and not on the weight.

use crate::lamination::Lamination;
use crate::topology::edge::Edge;

/// A bijection between `[dom, dom + len)` and `[ran, ran + len)`, keeping
/// order unless `reversing`. Normalized to `dom <= ran`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Pairing {
    dom: i64,
    ran: i64,
    len: i64,
    reversing: bool,
}

impl Pairing {
    pub(crate) fn new(dom: i64, ran: i64, len: i64, reversing: bool) -> Self {
        Pairing { dom: dom.min(ran), ran: dom.max(ran), len, reversing }
    }

    fn end(&self) -> i64 {
        self.ran + self.len
    }

    /// Identifies no two distinct points.
    fn is_trivial(&self) -> bool {
        self.len <= 0 || (self.dom == self.ran && (!self.reversing || self.len == 1))
    }

    fn normalized(self) -> Self {
        Pairing::new(self.dom, self.ran, self.len, self.reversing)
    }

    /// Start of the preimage of `[start, start + len)`, a run inside the range.
    fn pull_back(&self, start: i64, len: i64) -> i64 {
        if self.reversing {
            self.dom + self.ran + self.len - start - len
        } else {
            start - self.ran + self.dom
        }
    }
}

/// Highest end among `pairings`, or `floor` if that is higher.
fn top_end(pairings: &[Pairing], floor: i64) -> i64 {
    pairings.iter().map(Pairing::end).fold(floor, i64::max)
}

/// Number of orbits of `[0, n)` under the equivalence generated by `pairings`.
pub(crate) fn count_orbits(mut n: i64, pairings: impl IntoIterator<Item = Pairing>) -> u64 {
    let mut pairings: Vec<Pairing> = pairings
        .into_iter()
        .map(Pairing::normalized)
        .filter(|p| !p.is_trivial())
        .collect();
    let mut count = 0u64;
    let mut rounds = 0usize;
    loop {
        let top = top_end(&pairings, 0);
        if top < n {
            count += (n - top) as u64;
            n = top;
        }
        let Some(index) = pairings
            .iter()
            .enumerate()
            .filter(|(_, p)| p.end() == n)
            .min_by_key(|(_, p)| p.ran)
            .map(|(i, _)| i)
        else {
            break;
        };
        rounds += 1;
        let mut g = pairings.swap_remove(index);

        if g.dom == g.ran {
            // A reflection of [ran, n) onto itself: lower half against upper half.
            let half = g.len / 2;
            pairings.push(Pairing::new(g.ran, g.ran + g.len - half, half, true));
            pairings.retain(|p| !p.is_trivial());
            continue;
        }

        if g.dom + g.len > g.ran {
            if g.reversing {
                pairings.push(Pairing::new(g.dom, g.dom + g.len, g.ran - g.dom, true));
                pairings.push(Pairing::new(g.ran, g.ran, g.dom + g.len - g.ran, true));
                pairings.retain(|p| !p.is_trivial());
                continue;
            }
            let period = g.ran - g.dom;
            let fold = |start: i64| {
                if start >= g.ran {
                    g.dom + (start - g.dom) % period
                } else {
                    start
                }
            };
            for p in &mut pairings {
                *p = Pairing::new(fold(p.dom), fold(p.ran), p.len, p.reversing);
            }
        } else {
            for p in &mut pairings {
                let (dom_above, ran_above) = (p.dom >= g.ran, p.ran >= g.ran);
                if dom_above {
                    p.dom = g.pull_back(p.dom, p.len);
                }
                if ran_above {
                    p.ran = g.pull_back(p.ran, p.len);
                }
                if g.reversing && dom_above != ran_above {
                    p.reversing = !p.reversing;
                }
                *p = p.normalized();
            }
        }
        pairings.retain(|p| !p.is_trivial());

        // Everything in [t, n) now meets only `g`'s range.
        let t = top_end(&pairings, g.ran);
        if g.reversing {
            g.dom += g.len - (t - g.ran);
        }
        g.len = t - g.ran;
        if !g.is_trivial() {
            pairings.push(g);
        }
        n = t;
    }
    log::trace!("{count} orbits after {rounds} rounds");
    count
}

/// The interval pairings a multicurve's corners induce on its strands.
///
/// Strand `k` of label `l` is counted along `l`, so the strands of a
/// negative label run backwards through the numbering.
pub(crate) fn corner_pairings(lamination: &Lamination) -> (i64, Vec<Pairing>) {
    let weights = lamination.weights();
    let mut offsets = Vec::with_capacity(weights.len());
    let mut total = 0i64;
    for &w in weights {
        offsets.push(total);
        total += w.max(0);
    }
    // Interval of the first `d` strands from the tail (or the head) of
    // `l`, and whether it runs along the numbering.
    let run = |l: Edge, d: i64, from_head: bool| -> (i64, bool) {
        let (offset, w) = (offsets[l.index()], lamination.get(l));
        if from_head == l.is_positive() {
            (offset + w - d, false)
        } else {
            (offset, true)
        }
    };
    let mut pairings = Vec::new();
    for t in lamination.triangulation().triangles() {
        let [p, q, r] = t.edges();
        for [x, y, z] in [[p, q, r], [q, r, p], [r, p, q]] {
            let d = lamination.dual_weight(z);
            if d <= 0 {
                continue;
            }
            // Strands leave `x` at its head and enter `y` at its tail.
            let (x_start, x_up) = run(x, d, true);
            let (y_start, y_up) = run(y, d, false);
            pairings.push(Pairing::new(x_start, y_start, d, x_up != y_up));
        }
    }
    (total, pairings)
}
