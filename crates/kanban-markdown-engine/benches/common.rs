/// A board-style document repeated `size` times.
pub fn generate_board_content(size: usize) -> String {
    let base = "# Sprint\n\nWork on **bold** and _under_ text with #todo and @anna.\n\n- [ ] write tests\n- [x] ship [[Parser|parser]]\n  - nested item\n\n| a | b |\n| :--- | --- |\n| 1 | 2 |\n\n---: 1\nLeft\n:--: 2\nRight\n:---\n\n```mermaid\ngraph TD\n```\n\n";
    base.repeat(size)
}
