use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::bounded;
use flume::bounded as flume_bounded;
use lfring::{MpmcQueue, SpmcQueue};
use std::sync::mpsc::sync_channel;

const MESSAGES: usize = 100_000;
const BUFFER_SIZE: usize = 1024;

fn bench_1p_1c(c: &mut Criterion) {
    let mut group = c.benchmark_group("1p_1c");
    group.throughput(Throughput::Elements(MESSAGES as u64));

    group.bench_function("lfring_spmc", |b| {
        b.iter(|| {
            let queue = Arc::new(SpmcQueue::<usize, BUFFER_SIZE>::new());
            let q_send = queue.clone();
            let q_recv = queue.clone();

            let producer = thread::spawn(move || {
                let mut p = q_send.producer();
                for i in 0..MESSAGES {
                    while p.push(black_box(i)).is_err() {
                        std::hint::spin_loop();
                    }
                }
            });

            let consumer = thread::spawn(move || {
                for _ in 0..MESSAGES {
                    while q_recv.pop().is_err() {
                        std::hint::spin_loop();
                    }
                }
            });

            producer.join().unwrap();
            consumer.join().unwrap();
        });
    });

    group.bench_function("crossbeam_channel", |b| {
        b.iter(|| {
            let (tx, rx) = bounded::<usize>(BUFFER_SIZE);

            let producer = thread::spawn(move || {
                for i in 0..MESSAGES {
                    tx.send(black_box(i)).unwrap();
                }
            });

            let consumer = thread::spawn(move || {
                for _ in 0..MESSAGES {
                    rx.recv().unwrap();
                }
            });

            producer.join().unwrap();
            consumer.join().unwrap();
        });
    });

    group.bench_function("flume", |b| {
        b.iter(|| {
            let (tx, rx) = flume_bounded::<usize>(BUFFER_SIZE);

            let producer = thread::spawn(move || {
                for i in 0..MESSAGES {
                    tx.send(black_box(i)).unwrap();
                }
            });

            let consumer = thread::spawn(move || {
                for _ in 0..MESSAGES {
                    rx.recv().unwrap();
                }
            });

            producer.join().unwrap();
            consumer.join().unwrap();
        });
    });

    group.bench_function("std_mpsc", |b| {
        b.iter(|| {
            let (tx, rx) = sync_channel::<usize>(BUFFER_SIZE);

            let producer = thread::spawn(move || {
                for i in 0..MESSAGES {
                    tx.send(black_box(i)).unwrap();
                }
            });

            let consumer = thread::spawn(move || {
                for _ in 0..MESSAGES {
                    rx.recv().unwrap();
                }
            });

            producer.join().unwrap();
            consumer.join().unwrap();
        });
    });

    group.finish();
}

fn bench_1p_nc(c: &mut Criterion) {
    let mut group = c.benchmark_group("1p_4c");
    group.throughput(Throughput::Elements(MESSAGES as u64));
    const CONSUMERS: usize = 4;
    const MSGS_PER_CONSUMER: usize = MESSAGES / CONSUMERS;

    group.bench_function("lfring_spmc", |b| {
        b.iter(|| {
            let queue = Arc::new(SpmcQueue::<usize, BUFFER_SIZE>::new());
            let mut handles = vec![];

            let q = queue.clone();
            handles.push(thread::spawn(move || {
                let mut p = q.producer();
                for i in 0..MESSAGES {
                    while p.push(black_box(i)).is_err() {
                        std::hint::spin_loop();
                    }
                }
            }));

            for _ in 0..CONSUMERS {
                let q = queue.clone();
                handles.push(thread::spawn(move || {
                    for _ in 0..MSGS_PER_CONSUMER {
                        while q.pop().is_err() {
                            std::hint::spin_loop();
                        }
                    }
                }));
            }

            for h in handles {
                h.join().unwrap();
            }
        });
    });

    group.bench_function("crossbeam_channel", |b| {
        b.iter(|| {
            let (tx, rx) = bounded::<usize>(BUFFER_SIZE);
            let mut handles = vec![];

            handles.push(thread::spawn(move || {
                for i in 0..MESSAGES {
                    tx.send(black_box(i)).unwrap();
                }
            }));

            for _ in 0..CONSUMERS {
                let rx = rx.clone();
                handles.push(thread::spawn(move || {
                    for _ in 0..MSGS_PER_CONSUMER {
                        rx.recv().unwrap();
                    }
                }));
            }

            for h in handles {
                h.join().unwrap();
            }
        });
    });

    group.bench_function("flume", |b| {
        b.iter(|| {
            let (tx, rx) = flume_bounded::<usize>(BUFFER_SIZE);
            let mut handles = vec![];

            handles.push(thread::spawn(move || {
                for i in 0..MESSAGES {
                    tx.send(black_box(i)).unwrap();
                }
            }));

            for _ in 0..CONSUMERS {
                let rx = rx.clone();
                handles.push(thread::spawn(move || {
                    for _ in 0..MSGS_PER_CONSUMER {
                        rx.recv().unwrap();
                    }
                }));
            }

            for h in handles {
                h.join().unwrap();
            }
        });
    });

    group.finish();
}

fn bench_np_nc(c: &mut Criterion) {
    let mut group = c.benchmark_group("4p_4c");
    group.throughput(Throughput::Elements(MESSAGES as u64));
    const PRODUCERS: usize = 4;
    const CONSUMERS: usize = 4;
    const MSGS_PER_PRODUCER: usize = MESSAGES / PRODUCERS;
    const MSGS_PER_CONSUMER: usize = MESSAGES / CONSUMERS;

    group.bench_function("lfring_mpmc", |b| {
        b.iter(|| {
            let queue = Arc::new(MpmcQueue::<usize, BUFFER_SIZE>::new());
            let mut handles = vec![];

            for p in 0..PRODUCERS {
                let q = queue.clone();
                handles.push(thread::spawn(move || {
                    for i in 0..MSGS_PER_PRODUCER {
                        while q.push(black_box(p * MSGS_PER_PRODUCER + i)).is_err() {
                            std::hint::spin_loop();
                        }
                    }
                }));
            }

            for _ in 0..CONSUMERS {
                let q = queue.clone();
                handles.push(thread::spawn(move || {
                    for _ in 0..MSGS_PER_CONSUMER {
                        while q.pop().is_err() {
                            std::hint::spin_loop();
                        }
                    }
                }));
            }

            for h in handles {
                h.join().unwrap();
            }
        });
    });

    group.bench_function("crossbeam_channel", |b| {
        b.iter(|| {
            let (tx, rx) = bounded::<usize>(BUFFER_SIZE);
            let mut handles = vec![];

            for p in 0..PRODUCERS {
                let tx = tx.clone();
                handles.push(thread::spawn(move || {
                    for i in 0..MSGS_PER_PRODUCER {
                        tx.send(black_box(p * MSGS_PER_PRODUCER + i)).unwrap();
                    }
                }));
            }
            drop(tx);

            for _ in 0..CONSUMERS {
                let rx = rx.clone();
                handles.push(thread::spawn(move || {
                    for _ in 0..MSGS_PER_CONSUMER {
                        rx.recv().unwrap();
                    }
                }));
            }

            for h in handles {
                h.join().unwrap();
            }
        });
    });

    group.bench_function("flume", |b| {
        b.iter(|| {
            let (tx, rx) = flume_bounded::<usize>(BUFFER_SIZE);
            let mut handles = vec![];

            for p in 0..PRODUCERS {
                let tx = tx.clone();
                handles.push(thread::spawn(move || {
                    for i in 0..MSGS_PER_PRODUCER {
                        tx.send(black_box(p * MSGS_PER_PRODUCER + i)).unwrap();
                    }
                }));
            }
            drop(tx);

            for _ in 0..CONSUMERS {
                let rx = rx.clone();
                handles.push(thread::spawn(move || {
                    for _ in 0..MSGS_PER_CONSUMER {
                        rx.recv().unwrap();
                    }
                }));
            }

            for h in handles {
                h.join().unwrap();
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_1p_1c, bench_1p_nc, bench_np_nc);
criterion_main!(benches);
