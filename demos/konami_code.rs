use kamo::{HandlerTable, StructuralStreamExt, WindowStreamExt};

const CODE: [u32; 10] = [
    38, // up
    38, // up
    40, // down
    40, // down
    37, // left
    39, // right
    37, // left
    39, // right
    66, // b
    65, // a
];

fn main() {
    let mut window: HandlerTable<u32> = HandlerTable::new();
    window.declare("onkeyup");

    let keys = window.stream("onkeyup").expect("onkeyup is declared");
    keys.window_with_count(CODE.len())
        .filter(|recent| recent[..] == CODE[..])
        .subscribe(|_| println!("Congratulations!"));

    // Some noise, then the code itself
    for key in [13, 38].into_iter().chain(CODE) {
        window.fire("onkeyup", key).expect("onkeyup is declared");
    }
}
