//! Work-queue example: several producers enqueue jobs, a pool of workers
//! drains them through the multi-producer queue.

use lfring::MpmcQueue;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn main() {
    println!("Work Queue Example\n");

    const NUM_PRODUCERS: usize = 2;
    const NUM_WORKERS: usize = 4;
    const JOBS_PER_PRODUCER: usize = 10;
    const NUM_JOBS: usize = NUM_PRODUCERS * JOBS_PER_PRODUCER;

    let jobs = Arc::new(MpmcQueue::<String, 128>::new());
    let done = Arc::new(AtomicUsize::new(0));

    let mut producers = vec![];
    for p in 0..NUM_PRODUCERS {
        let jobs_tx = jobs.clone();
        producers.push(thread::spawn(move || {
            for i in 0..JOBS_PER_PRODUCER {
                let job = format!("Job-{}-{:02}", p, i);
                while jobs_tx.push(job.clone()).is_err() {
                    std::hint::spin_loop();
                }
                println!("Enqueued: {}", job);
                thread::sleep(Duration::from_millis(50));
            }
        }));
    }

    let mut workers = vec![];
    for worker_id in 0..NUM_WORKERS {
        let jobs_rx = jobs.clone();
        let done = done.clone();

        workers.push(thread::spawn(move || {
            let mut processed = 0;
            loop {
                match jobs_rx.pop() {
                    Ok(job) => {
                        println!("Worker {} processing: {}", worker_id, job);
                        thread::sleep(Duration::from_millis(100));
                        done.fetch_add(1, Ordering::Relaxed);
                        processed += 1;
                    }
                    Err(_) => {
                        if done.load(Ordering::Relaxed) >= NUM_JOBS {
                            break;
                        }
                        thread::sleep(Duration::from_millis(10));
                    }
                }
            }
            println!("Worker {} finished ({} jobs)", worker_id, processed);
        }));
    }

    for p in producers {
        p.join().unwrap();
    }
    println!("All jobs enqueued!");

    for worker in workers {
        worker.join().unwrap();
    }

    println!("\nWork queue example completed: {} jobs processed", NUM_JOBS);
}
