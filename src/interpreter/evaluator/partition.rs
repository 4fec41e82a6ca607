use rand::{RngCore, SeedableRng, rngs::StdRng};
use rayon::{ThreadPool, ThreadPoolBuilder, prelude::*};
use tracing::{debug, trace, warn};

use crate::{
    ast::Expr,
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{EvalResult, Evaluator},
            grammar::Grammar,
            unique::UniquenessPool,
        },
        value::{batch::Batch, core::Value},
    },
};

/// Splits `total` repetitions into `workers` contiguous chunks.
///
/// The first `workers - 1` chunks get `total / workers` repetitions each and
/// the last chunk takes the remainder, so the sizes always sum to `total`.
///
/// # Example
/// ```
/// use rulegen::interpreter::evaluator::partition::chunk_sizes;
///
/// assert_eq!(chunk_sizes(10, 3), vec![3, 3, 4]);
/// assert_eq!(chunk_sizes(2, 4), vec![0, 0, 0, 2]);
/// ```
#[must_use]
pub fn chunk_sizes(total: usize, workers: usize) -> Vec<usize> {
    let workers = workers.max(1);
    let base = total / workers;

    let mut sizes = vec![base; workers];
    sizes[workers - 1] = total - base * (workers - 1);
    sizes
}

/// Runs `print` statements, splitting large ones across worker threads.
///
/// Every chunk is evaluated by its own [`Evaluator`] with a random source
/// seeded from the master source, and the chunks' results are concatenated
/// in chunk order. Chunks draw from the shared uniqueness pool in whatever
/// order their threads reach it, so a seeded partitioned print that uses
/// `one_of_unique` may pick different values from run to run; prints that
/// do not touch the pool are reproducible for a given worker count and
/// threshold. The worker threads are created on first use and kept for
/// the rest of the run. If they cannot be created, generation continues on
/// the calling thread.
#[derive(Debug)]
pub struct WorkPartitioner {
    workers:     usize,
    threshold:   usize,
    threads:     Option<ThreadPool>,
    unavailable: bool,
}

impl WorkPartitioner {
    /// Creates a partitioner for `workers` threads that engages from
    /// `threshold` repetitions upwards.
    #[must_use]
    pub const fn new(workers: usize, threshold: usize) -> Self {
        Self { workers,
               threshold,
               threads: None,
               unavailable: false }
    }

    /// The number of workers large statements are split across.
    #[must_use]
    pub const fn workers(&self) -> usize {
        self.workers
    }

    /// Evaluates `expr` for `total` repetitions.
    ///
    /// Small counts, constant expressions and single-worker configurations
    /// run on the calling thread.
    ///
    /// A partitioned run that faults puts the uniqueness pool back the way
    /// it found it. When the fault came from the pool, the statement is
    /// replayed on the calling thread so that the reported counts cover the
    /// whole statement rather than one chunk.
    ///
    /// # Errors
    /// The first fault raised by any chunk. No partial output is returned.
    pub fn run(&mut self,
               grammar: &Grammar,
               pool: &UniquenessPool,
               expr: &Expr,
               total: usize,
               master: &mut StdRng)
               -> EvalResult<Batch> {
        let workers = self.workers;
        let sequential = workers <= 1 || total < self.threshold || matches!(expr, Expr::Literal { .. });

        if !sequential && let Some(threads) = self.thread_pool() {
            let checkpoint = pool.checkpoint();
            match run_parallel(threads, grammar, pool, expr, total, workers, master) {
                Ok(values) => return Ok(Batch::Many(values)),
                Err(error) => {
                    pool.restore(checkpoint);
                    if !matches!(error,
                                 RuntimeError::UniquePoolExhausted { .. }
                                 | RuntimeError::UniquePoolInsufficient { .. })
                    {
                        return Err(error);
                    }
                    debug!(%error, "partitioned print rolled back, replaying sequentially");
                },
            }
        }

        Evaluator::forked(grammar, pool, master).evaluate(expr, total)
    }

    fn thread_pool(&mut self) -> Option<&ThreadPool> {
        if self.threads.is_none() && !self.unavailable {
            match ThreadPoolBuilder::new().num_threads(self.workers)
                                          .thread_name(|index| format!("rulegen-worker-{index}"))
                                          .build()
            {
                Ok(threads) => self.threads = Some(threads),
                Err(error) => {
                    warn!(%error, "worker threads unavailable, generating sequentially");
                    self.unavailable = true;
                },
            }
        }
        self.threads.as_ref()
    }
}

fn run_parallel(threads: &ThreadPool,
                grammar: &Grammar,
                pool: &UniquenessPool,
                expr: &Expr,
                total: usize,
                workers: usize,
                master: &mut StdRng)
                -> EvalResult<Vec<Value>> {
    let chunks = chunk_sizes(total, workers).into_iter()
                                            .map(|size| (size, master.next_u64()))
                                            .collect::<Vec<_>>();
    debug!(total, workers, "partitioning print");

    let results = threads.install(|| {
                             chunks.par_iter()
                                   .enumerate()
                                   .map(|(index, &(size, seed))| {
                                       trace!(chunk = index, size, "chunk started");
                                       let rng = StdRng::seed_from_u64(seed);
                                       Evaluator::new(grammar, pool, rng).evaluate(expr, size)
                                                                         .map(Batch::into_values)
                                   })
                                   .collect::<EvalResult<Vec<_>>>()
                         })?;

    Ok(results.concat())
}
