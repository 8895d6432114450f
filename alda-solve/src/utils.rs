use resolvo::SolvableId;
use resolvo::utils::Pool;

use crate::types::{Candidate, DepName, DepSpec};

/// Core logic behind choosing the right candidate from a set.
pub(crate) fn sort_candidates(pool: &Pool<DepSpec, DepName>, solvables: &mut [SolvableId]) {
    solvables.sort_by(|&a, &b| {
        let record_a = &pool.resolve_solvable(a).record;
        let record_b = &pool.resolve_solvable(b).record;
        // We always prioritize higher versions.
        record_b
            .version()
            .cmp(&record_a.version())
            // We prefer real packages over capabilities (in case of the
            // same version).
            .then_with(|| record_a.is_virtual().cmp(&record_b.is_virtual()))
            // Arena order as a deterministic tie-break, which follows the
            // repository load order.
            .then_with(|| record_a.package().cmp(&record_b.package()))
    });
}
