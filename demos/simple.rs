//! Simple usage example: one producer, two consumers.

use lfring::SpmcQueue;
use std::sync::Arc;
use std::thread;

fn main() {
    println!("lfring - Simple SPMC Example\n");

    // Create a queue with 16 slots (15 usable).
    let queue = Arc::new(SpmcQueue::<String, 16>::new());

    let producer_queue = queue.clone();
    let producer = thread::spawn(move || {
        let mut producer = producer_queue.producer();
        for i in 0..10 {
            let message = format!("Message {}", i);
            println!("Sending: {}", message);

            while producer.push(message.clone()).is_err() {
                // Queue is full, spin and retry
                std::hint::spin_loop();
            }

            // Small delay to make output readable
            thread::sleep(std::time::Duration::from_millis(100));
        }
        println!("Producer finished!");
    });

    let mut consumers = vec![];
    for id in 0..2 {
        let consumer_queue = queue.clone();
        consumers.push(thread::spawn(move || {
            let mut received = 0;
            for _ in 0..5 {
                loop {
                    match consumer_queue.pop() {
                        Ok(message) => {
                            println!("Consumer {} received: {}", id, message);
                            received += 1;
                            break;
                        }
                        Err(_) => {
                            // Queue is empty, spin and retry
                            std::hint::spin_loop();
                        }
                    }
                }
            }
            println!("Consumer {} finished ({} messages)", id, received);
        }));
    }

    producer.join().unwrap();
    for c in consumers {
        c.join().unwrap();
    }

    println!("\nExample completed successfully!");
}
