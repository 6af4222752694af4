//! Solve oracle for 0/1 integer programs, backed by CaDiCaL

use super::cnf::{model_literal, Clause, CnfEncoder, NormalizedObjective, WeightedLit};
use super::model::{Assignment, Model, VarId};
use crate::config::TieBreak;
use cadical::Solver;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Failures surfaced by a solve oracle
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SolveError {
    #[error("no assignment satisfies all constraints")]
    Infeasible,
    #[error("objective is unbounded")]
    Unbounded,
    #[error("solver failure: {0}")]
    Backend(String),
}

/// A black-box optimiser: returns an optimal complete assignment or an error
pub trait SolveOracle {
    fn solve(&mut self, model: &Model) -> Result<Assignment, SolveError>;
}

/// Thin wrapper around a CaDiCaL instance
struct SatBackend {
    solver: Solver,
    max_variable: usize,
    clause_count: usize,
    calls: usize,
}

impl SatBackend {
    fn new() -> Self {
        Self {
            solver: Solver::new(),
            max_variable: 0,
            clause_count: 0,
            calls: 0,
        }
    }

    fn add_clauses(&mut self, clauses: &[Clause]) -> Result<(), SolveError> {
        for clause in clauses {
            self.add_clause(clause)?;
        }
        Ok(())
    }

    fn add_clause(&mut self, clause: &Clause) -> Result<(), SolveError> {
        if clause.is_empty() {
            return Err(SolveError::Backend("empty clause".to_string()));
        }

        for &literal in &clause.literals {
            self.max_variable = self.max_variable.max(literal.unsigned_abs() as usize);
        }

        self.solver.add_clause(clause.literals.iter().copied());
        self.clause_count += 1;
        Ok(())
    }

    /// `Ok(true)` for SAT, `Ok(false)` for UNSAT under the assumptions
    fn solve_with(&mut self, assumptions: &[i32]) -> Result<bool, SolveError> {
        self.calls += 1;
        match self.solver.solve_with(assumptions.iter().copied()) {
            Some(result) => Ok(result),
            None => Err(SolveError::Backend("search was interrupted".to_string())),
        }
    }

    /// Whether the literal's variable occurs in some clause
    fn knows(&self, literal: i32) -> bool {
        literal.unsigned_abs() as usize <= self.max_variable
    }

    /// Truth value of a literal in the last model; unseen variables are false
    fn is_true(&self, literal: i32) -> bool {
        let var = literal.unsigned_abs() as usize;
        let positive = self.knows(literal) && self.solver.value(var as i32) == Some(true);
        if literal > 0 { positive } else { !positive }
    }

    /// Whether an assumption took part in the last UNSAT answer
    fn failed(&self, assumption: i32) -> bool {
        self.knows(assumption) && self.solver.failed(assumption)
    }

    fn model_values(&self, num_variables: usize) -> Vec<u8> {
        (0..num_variables)
            .map(|v| self.is_true(model_literal(VarId(v))) as u8)
            .collect()
    }
}

/// Pairwise disjoint sets of objective literals, each forced to contribute
/// at least its smallest weight in every model
struct DisjointCores {
    cores: Vec<Vec<WeightedLit>>,
    /// Objective literals outside every core
    free: Vec<WeightedLit>,
}

impl DisjointCores {
    /// Repeatedly assume every free objective literal false and move the
    /// failed assumptions into a new core, until the assumptions are satisfiable.
    /// Leaves the backend holding the final model.
    fn extract(backend: &mut SatBackend, items: &[WeightedLit]) -> Result<Self, SolveError> {
        let mut cores = Vec::new();
        let mut free = items.to_vec();

        loop {
            let assumptions: Vec<i32> = free.iter().map(|item| -item.lit).collect();
            if backend.solve_with(&assumptions)? {
                return Ok(Self { cores, free });
            }

            let (core, rest): (Vec<_>, Vec<_>) =
                free.into_iter().partition(|item| backend.failed(-item.lit));
            if core.is_empty() {
                return Err(SolveError::Backend("unsatisfiable core without objective literals".to_string()));
            }

            cores.push(core);
            free = rest;
        }
    }

    fn min_weight(core: &[WeightedLit]) -> u64 {
        core.iter().map(|item| item.weight).min().unwrap_or(0)
    }

    /// Sum of the core weights, a lower bound on the objective
    fn lower_bound(&self) -> u64 {
        self.cores.iter().map(|core| Self::min_weight(core)).sum()
    }

    /// Assumptions that hold exactly when the objective equals the lower bound:
    /// free literals false, each core at its smallest weight
    fn tight_bound(&self, encoder: &mut CnfEncoder) -> Vec<i32> {
        let mut assumptions: Vec<i32> = self.free.iter().map(|item| -item.lit).collect();

        for core in self.cores.iter().filter(|core| core.len() > 1) {
            let weight = Self::min_weight(core) as usize;
            let outputs = encoder.counter(core, weight + 1);
            assumptions.push(-outputs[weight]);
        }

        assumptions
    }
}

/// Statistics about the last solve
#[derive(Debug, Clone, Default)]
pub struct OracleStatistics {
    pub sat_variables: usize,
    pub clauses: usize,
    pub sat_calls: usize,
    pub cores: usize,
    pub lower_bound: u64,
    pub improvements: usize,
    pub optimum: Option<i64>,
    pub solve_time: Duration,
}

impl std::fmt::Display for OracleStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Oracle Statistics:")?;
        writeln!(f, "  SAT variables: {}", self.sat_variables)?;
        writeln!(f, "  Clauses: {}", self.clauses)?;
        writeln!(f, "  SAT calls: {}", self.sat_calls)?;
        writeln!(f, "  Cores: {} (lower bound {})", self.cores, self.lower_bound)?;
        writeln!(f, "  Objective improvements: {}", self.improvements)?;
        match self.optimum {
            Some(value) => writeln!(f, "  Optimum: {}", value)?,
            None => writeln!(f, "  Optimum: -")?,
        }
        writeln!(f, "  Solve time: {:.3}s", self.solve_time.as_secs_f64())?;
        Ok(())
    }
}

/// Exact optimiser.
///
/// A lower bound comes from disjoint unsatisfiable cores over the objective
/// literals. When a model meets it under the per-core bounds the search stops
/// there; otherwise a linear SAT-UNSAT search over a counter on the whole
/// objective closes the gap.
pub struct CadicalOracle {
    tie_break: TieBreak,
    statistics: OracleStatistics,
}

impl CadicalOracle {
    pub fn new(tie_break: TieBreak) -> Self {
        Self {
            tie_break,
            statistics: OracleStatistics::default(),
        }
    }

    pub fn statistics(&self) -> &OracleStatistics {
        &self.statistics
    }

    /// Fix model variables in index order, preferring 1 whenever the bound allows it.
    /// Decisions are added as unit clauses; the backend is not reused afterwards.
    fn break_ties(
        &self,
        backend: &mut SatBackend,
        bound: &[i32],
        num_variables: usize,
        mut values: Vec<u8>,
    ) -> Result<Vec<u8>, SolveError> {
        for &literal in bound {
            backend.add_clause(&Clause::unit(literal))?;
        }

        for v in 0..num_variables {
            let lit = model_literal(VarId(v));
            if !backend.knows(lit) {
                continue;
            }

            if values[v] == 0 {
                if backend.solve_with(&[lit])? {
                    values = backend.model_values(num_variables);
                } else {
                    backend.add_clause(&Clause::unit(-lit))?;
                    continue;
                }
            }
            backend.add_clause(&Clause::unit(lit))?;
        }

        Ok(values)
    }
}

impl Default for CadicalOracle {
    fn default() -> Self {
        Self::new(TieBreak::EarliestFirst)
    }
}

impl SolveOracle for CadicalOracle {
    fn solve(&mut self, model: &Model) -> Result<Assignment, SolveError> {
        let start_time = Instant::now();
        let num_variables = model.num_variables();

        let mut encoder = CnfEncoder::new(num_variables);
        for constraint in model.constraints() {
            encoder.encode_constraint(constraint);
        }

        let mut backend = SatBackend::new();
        backend.add_clauses(&encoder.take_clauses())?;

        if !backend.solve_with(&[])? {
            self.statistics = OracleStatistics {
                sat_variables: encoder.variable_count(),
                clauses: backend.clause_count,
                sat_calls: backend.calls,
                solve_time: start_time.elapsed(),
                ..Default::default()
            };
            return Err(SolveError::Infeasible);
        }

        let mut objective = NormalizedObjective::new(model.objective());
        // variables outside every clause stay 0 and add nothing to the search
        objective.items.retain(|item| backend.knows(item.lit));

        let cores = DisjointCores::extract(&mut backend, &objective.items)?;
        let lower_bound = cores.lower_bound();
        let mut best = backend.model_values(num_variables);
        let mut cost = objective.cost(|lit| backend.is_true(lit));
        let mut improvements = 0;

        let mut bound = cores.tight_bound(&mut encoder);
        backend.add_clauses(&encoder.take_clauses())?;

        if cost > lower_bound {
            if backend.solve_with(&bound)? {
                best = backend.model_values(num_variables);
                cost = objective.cost(|lit| backend.is_true(lit));
                improvements += 1;
            } else {
                // outputs[j] <=> objective >= j + 1, tracked up to cost + 1
                let outputs = encoder.counter(&objective.items, cost as usize + 1);
                backend.add_clauses(&encoder.take_clauses())?;

                while cost > lower_bound && backend.solve_with(&[-outputs[cost as usize - 1]])? {
                    best = backend.model_values(num_variables);
                    cost = objective.cost(|lit| backend.is_true(lit));
                    improvements += 1;
                }

                bound = vec![-outputs[cost as usize]];
            }
        }

        if self.tie_break == TieBreak::EarliestFirst {
            best = self.break_ties(&mut backend, &bound, num_variables, best)?;
        }

        let assignment = Assignment::new(model, best);
        self.statistics = OracleStatistics {
            sat_variables: encoder.variable_count(),
            clauses: backend.clause_count,
            sat_calls: backend.calls,
            cores: cores.cores.len(),
            lower_bound,
            improvements,
            optimum: Some(assignment.objective()),
            solve_time: start_time.elapsed(),
        };

        Ok(assignment)
    }
}
