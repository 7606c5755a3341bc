//! Backward walks over value definitions.

use std::collections::{HashMap, HashSet};

use crate::{ExprId, Fusion, ValId};

/// Leaves reachable from `outputs` by following definitions backwards.
///
/// A value is a leaf when it has no definition or belongs to `stop`. Each
/// leaf appears once, in discovery order.
pub fn inputs_of(fusion: &Fusion, outputs: &[ValId], stop: &HashSet<ValId>) -> Vec<ValId> {
    let mut leaves = Vec::new();
    let mut visited = HashSet::new();
    let mut stack: Vec<ValId> = outputs.iter().rev().copied().collect();

    while let Some(id) = stack.pop() {
        if !visited.insert(id) {
            continue;
        }
        match fusion.definition(id).filter(|_| !stop.contains(&id)) {
            Some(def) => stack.extend(fusion.expr(def).inputs().iter().rev()),
            None => leaves.push(id),
        }
    }
    leaves
}

/// Expressions on the paths from `from` to `to`, producers first.
///
/// The walk starts at `to` and does not continue past members of `from`.
pub fn exprs_between(fusion: &Fusion, from: &HashSet<ValId>, to: &[ValId]) -> Vec<ExprId> {
    fn visit(
        fusion: &Fusion,
        id: ValId,
        from: &HashSet<ValId>,
        seen: &mut HashSet<ExprId>,
        order: &mut Vec<ExprId>,
    ) {
        if from.contains(&id) {
            return;
        }
        let Some(def) = fusion.definition(id) else { return };
        if !seen.insert(def) {
            return;
        }
        for &input in fusion.expr(def).inputs() {
            visit(fusion, input, from, seen, order);
        }
        order.push(def);
    }

    let mut seen = HashSet::new();
    let mut order = Vec::new();
    for &id in to {
        visit(fusion, id, from, &mut seen, &mut order);
    }
    order
}

/// Values on the paths from `from` to `to`, including both ends.
pub fn vals_between(fusion: &Fusion, from: &HashSet<ValId>, to: &[ValId]) -> HashSet<ValId> {
    fn reaches(
        fusion: &Fusion,
        id: ValId,
        from: &HashSet<ValId>,
        memo: &mut HashMap<ValId, bool>,
    ) -> bool {
        if let Some(&known) = memo.get(&id) {
            return known;
        }
        let result = from.contains(&id)
            || match fusion.definition(id) {
                // Every input is visited so that all paths get recorded.
                Some(def) => {
                    fusion.expr(def).inputs().iter().fold(false, |acc, &i| reaches(fusion, i, from, memo) | acc)
                }
                None => false,
            };
        memo.insert(id, result);
        result
    }

    let mut memo = HashMap::new();
    for &id in to {
        reaches(fusion, id, from, &mut memo);
    }
    memo.into_iter().filter_map(|(id, on_path)| on_path.then_some(id)).collect()
}

/// Whether a scalar evaluates to a constant: it holds a value, or it is
/// defined by an expression whose inputs all do.
pub fn is_const_scalar(fusion: &Fusion, id: ValId) -> bool {
    let Some(val) = fusion.get_val(id) else { return false };
    let Some(scalar) = val.as_scalar() else { return false };
    if scalar.is_const() {
        return true;
    }
    match val.definition() {
        Some(def) => {
            let inputs = fusion.expr(def).inputs();
            !inputs.is_empty() && inputs.iter().all(|&input| is_const_scalar(fusion, input))
        }
        None => false,
    }
}
