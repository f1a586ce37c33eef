// Fragmentation forcing tool - provokes buddy allocator fragmentation
// so fragwatch has something to measure.
//
// Usage:
//   cargo run --bin force-frag -- <order>
//
// Grows the heap one page at a time and dirties each page. The pages are
// contiguous in virtual memory but typically scattered physically, which
// drives down the higher-order free-block counts in /proc/buddyinfo.

use clap::Parser;

const PAGE_SIZE_IN_BYTES: usize = 4096;

#[derive(Parser, Debug)]
#[command(name = "force-frag")]
#[command(about = "Force memory fragmentation by touching 2^order pages one at a time", long_about = None)]
struct Args {
    /// Allocation order: 2^order pages are allocated and dirtied
    #[arg(value_name = "ORDER")]
    order: u32,

    /// Keep the pages resident until Enter is pressed
    #[arg(short, long)]
    hold: bool,
}

fn main() {
    let args = Args::parse();
    let numpages = 1usize << args.order;

    println!("Using order {}, creating {} pages", args.order, numpages);

    // One boxed page per allocation so the allocator cannot coalesce
    // them into a single large block.
    let mut pages: Vec<Box<[u8; PAGE_SIZE_IN_BYTES]>> = Vec::with_capacity(numpages);
    for _ in 0..numpages {
        let mut page = Box::new([0u8; PAGE_SIZE_IN_BYTES]);
        page.fill(b'a');
        pages.push(page);
    }

    println!("Forced Fragmentation Complete!");

    if args.hold {
        println!("Holding {} pages; press Enter to release.", pages.len());
        let mut line = String::new();
        let _ = std::io::stdin().read_line(&mut line);
    }
}
