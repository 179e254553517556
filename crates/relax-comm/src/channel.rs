//! In-process worker group over crossbeam channels.
//!
//! [`ChannelComm::group`] builds one endpoint per worker and connects every
//! ordered pair `(src, dst)`, including `src == dst`, with its own unbounded
//! channel:
//!
//! ```text
//!            dst 0        dst 1        dst 2
//! src 0   [ 0 → 0 ]    [ 0 → 1 ]    [ 0 → 2 ]
//! src 1   [ 1 → 0 ]    [ 1 → 1 ]    [ 1 → 2 ]
//! src 2   [ 2 → 0 ]    [ 2 → 1 ]    [ 2 → 2 ]
//! ```
//!
//! Each channel is FIFO, so messages between two workers are matched in the
//! order they were sent, which is the ordering guarantee MPI gives for a
//! fixed (source, tag) pair. Sends never block; a combined send/receive
//! therefore completes as soon as the peer's message is available, and a
//! ring in which every worker sends before it receives cannot deadlock.
//!
//! An endpoint that is dropped (its thread exited or panicked) disconnects
//! all of its channels. Peers waiting on it observe
//! [`CommError::Disconnected`] instead of hanging.

use crossbeam_channel::{unbounded, Receiver, Sender};
use relax_core::{CommError, Communicator, Rank, Tag};

use crate::{check_global, check_rank};

/// Wire format between two endpoints.
#[derive(Debug)]
enum Packet {
    /// Coordinator status for [`Communicator::broadcast_status`].
    Status(bool),
    /// One block of a scatter or gather.
    Block(Vec<f32>),
    /// Point-to-point payload of a combined send/receive.
    Tagged { tag: Tag, data: Vec<f32> },
}

impl Packet {
    fn kind(&self) -> &'static str {
        match self {
            Packet::Status(_) => "status",
            Packet::Block(_) => "collective block",
            Packet::Tagged { .. } => "tagged message",
        }
    }
}

/// One worker's endpoint in an in-process group.
#[derive(Debug)]
pub struct ChannelComm {
    rank: Rank,
    size: usize,
    /// `outboxes[dst]` sends to worker `dst`.
    outboxes: Vec<Sender<Packet>>,
    /// `inboxes[src]` receives from worker `src`.
    inboxes: Vec<Receiver<Packet>>,
}

impl ChannelComm {
    /// Create a fully connected group of `size` endpoints, in rank order.
    ///
    /// Returns `Err(CommError::Init)` if `size == 0`.
    pub fn group(size: usize) -> Result<Vec<ChannelComm>, CommError> {
        if size == 0 {
            return Err(CommError::Init {
                reason: "a worker group needs at least one member".into(),
            });
        }

        let mut outboxes: Vec<Vec<Sender<Packet>>> = (0..size).map(|_| Vec::new()).collect();
        let mut inboxes: Vec<Vec<Receiver<Packet>>> = (0..size).map(|_| Vec::new()).collect();
        // Push order makes outboxes[src][dst] and inboxes[dst][src] line up.
        for src_outbox in outboxes.iter_mut() {
            for dst_inbox in inboxes.iter_mut() {
                let (tx, rx) = unbounded();
                src_outbox.push(tx);
                dst_inbox.push(rx);
            }
        }

        Ok(outboxes
            .into_iter()
            .zip(inboxes)
            .enumerate()
            .map(|(r, (outboxes, inboxes))| ChannelComm {
                rank: Rank(r),
                size,
                outboxes,
                inboxes,
            })
            .collect())
    }

    fn post(&self, dest: Rank, packet: Packet) -> Result<(), CommError> {
        tracing::trace!(from = %self.rank, to = %dest, kind = packet.kind(), "send");
        self.outboxes[dest.index()]
            .send(packet)
            .map_err(|_| CommError::Disconnected { peer: dest })
    }

    fn take(&self, source: Rank) -> Result<Packet, CommError> {
        let packet = self.inboxes[source.index()]
            .recv()
            .map_err(|_| CommError::Disconnected { peer: source })?;
        tracing::trace!(from = %source, to = %self.rank, kind = packet.kind(), "recv");
        Ok(packet)
    }

    /// Receive one collective block from `source` into `dst`.
    fn take_block(&self, source: Rank, dst: &mut [f32]) -> Result<(), CommError> {
        match self.take(source)? {
            Packet::Block(data) => copy_payload(source, &data, dst),
            _ => Err(CommError::UnexpectedMessage {
                peer: source,
                expected: "collective block",
            }),
        }
    }
}

fn copy_payload(peer: Rank, data: &[f32], dst: &mut [f32]) -> Result<(), CommError> {
    if data.len() != dst.len() {
        return Err(CommError::SizeMismatch {
            peer,
            expected: dst.len(),
            actual: data.len(),
        });
    }
    dst.copy_from_slice(data);
    Ok(())
}

impl Communicator for ChannelComm {
    fn rank(&self) -> Rank {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn broadcast_status(&mut self, root: Rank, ok: bool) -> Result<bool, CommError> {
        check_rank(root, self.size)?;
        if self.is_root(root) {
            for peer in (0..self.size).map(Rank).filter(|&p| p != root) {
                self.post(peer, Packet::Status(ok))?;
            }
            return Ok(ok);
        }
        match self.take(root)? {
            Packet::Status(ok) => Ok(ok),
            _ => Err(CommError::UnexpectedMessage {
                peer: root,
                expected: "status",
            }),
        }
    }

    fn scatter(
        &mut self,
        root: Rank,
        global: Option<&[f32]>,
        local: &mut [f32],
    ) -> Result<(), CommError> {
        check_rank(root, self.size)?;
        if !self.is_root(root) {
            return self.take_block(root, local);
        }

        check_global(global.map(<[f32]>::len), local.len(), self.size)?;
        let Some(global) = global else {
            return Ok(());
        };
        let n = local.len();
        for dest in (0..self.size).map(Rank) {
            let block = &global[dest.index() * n..(dest.index() + 1) * n];
            if dest == root {
                local.copy_from_slice(block);
            } else {
                self.post(dest, Packet::Block(block.to_vec()))?;
            }
        }
        Ok(())
    }

    fn gather(
        &mut self,
        root: Rank,
        local: &[f32],
        global: Option<&mut [f32]>,
    ) -> Result<(), CommError> {
        check_rank(root, self.size)?;
        if !self.is_root(root) {
            return self.post(root, Packet::Block(local.to_vec()));
        }

        check_global(global.as_deref().map(<[f32]>::len), local.len(), self.size)?;
        let Some(global) = global else {
            return Ok(());
        };
        let n = local.len();
        for source in (0..self.size).map(Rank) {
            let block = &mut global[source.index() * n..(source.index() + 1) * n];
            if source == root {
                block.copy_from_slice(local);
            } else {
                self.take_block(source, block)?;
            }
        }
        Ok(())
    }

    fn send_receive(
        &mut self,
        send: &[f32],
        dest: Rank,
        recv: &mut [f32],
        source: Rank,
        tag: Tag,
    ) -> Result<(), CommError> {
        check_rank(dest, self.size)?;
        check_rank(source, self.size)?;
        self.post(
            dest,
            Packet::Tagged {
                tag,
                data: send.to_vec(),
            },
        )?;
        match self.take(source)? {
            Packet::Tagged { tag: actual, data } => {
                if actual != tag {
                    return Err(CommError::TagMismatch {
                        peer: source,
                        expected: tag,
                        actual,
                    });
                }
                copy_payload(source, &data, recv)
            }
            _ => Err(CommError::UnexpectedMessage {
                peer: source,
                expected: "tagged message",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_assigns_ranks_in_order() {
        let group = ChannelComm::group(3).unwrap();
        let ranks: Vec<_> = group.iter().map(|c| c.rank()).collect();
        assert_eq!(ranks, vec![Rank(0), Rank(1), Rank(2)]);
        assert!(group.iter().all(|c| c.size() == 3));
    }

    #[test]
    fn empty_group_rejected() {
        assert!(matches!(ChannelComm::group(0), Err(CommError::Init { .. })));
    }

    #[test]
    fn single_worker_exchanges_with_itself() {
        let mut comm = ChannelComm::group(1).unwrap().remove(0);
        let mut recv = [0.0; 3];
        comm.send_receive(&[1.0, 2.0, 3.0], Rank(0), &mut recv, Rank(0), Tag(333))
            .unwrap();
        assert_eq!(recv, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn single_worker_collectives_are_copies() {
        let mut comm = ChannelComm::group(1).unwrap().remove(0);
        assert!(comm.broadcast_status(Rank(0), true).unwrap());
        let mut local = [0.0; 2];
        comm.scatter(Rank(0), Some(&[4.0, 5.0]), &mut local).unwrap();
        assert_eq!(local, [4.0, 5.0]);
        let mut global = [0.0; 2];
        comm.gather(Rank(0), &local, Some(&mut global)).unwrap();
        assert_eq!(global, [4.0, 5.0]);
    }

    #[test]
    fn tag_mismatch_detected() {
        let mut comm = ChannelComm::group(1).unwrap().remove(0);
        comm.post(
            Rank(0),
            Packet::Tagged {
                tag: Tag(1),
                data: vec![0.0],
            },
        )
        .unwrap();
        let mut recv = [0.0];
        // Our own send lands behind the stale message and is never read.
        let err = comm
            .send_receive(&[0.0], Rank(0), &mut recv, Rank(0), Tag(333))
            .unwrap_err();
        assert!(matches!(
            err,
            CommError::TagMismatch {
                expected: Tag(333),
                actual: Tag(1),
                ..
            }
        ));
    }

    #[test]
    fn short_payload_detected() {
        let mut comm = ChannelComm::group(1).unwrap().remove(0);
        let mut recv = [0.0; 4];
        let err = comm
            .send_receive(&[1.0, 2.0], Rank(0), &mut recv, Rank(0), Tag(333))
            .unwrap_err();
        assert!(matches!(
            err,
            CommError::SizeMismatch {
                expected: 4,
                actual: 2,
                ..
            }
        ));
    }

    #[test]
    fn root_must_supply_correctly_sized_global() {
        let mut comm = ChannelComm::group(1).unwrap().remove(0);
        let mut local = [0.0; 2];
        assert!(matches!(
            comm.scatter(Rank(0), None, &mut local),
            Err(CommError::BufferMismatch { .. })
        ));
        assert!(matches!(
            comm.scatter(Rank(0), Some(&[1.0; 3]), &mut local),
            Err(CommError::BufferMismatch { .. })
        ));
    }

    #[test]
    fn invalid_ranks_rejected() {
        let mut comm = ChannelComm::group(2).unwrap().remove(0);
        let mut recv = [0.0];
        assert!(matches!(
            comm.send_receive(&[0.0], Rank(2), &mut recv, Rank(1), Tag(0)),
            Err(CommError::InvalidRank { rank: Rank(2), size: 2 })
        ));
        assert!(matches!(
            comm.broadcast_status(Rank(5), true),
            Err(CommError::InvalidRank { .. })
        ));
    }

    #[test]
    fn dropped_peer_reports_disconnect() {
        let mut group = ChannelComm::group(2).unwrap();
        let peer = group.pop().unwrap();
        drop(peer);
        let mut comm = group.pop().unwrap();
        let mut recv = [0.0];
        let err = comm
            .send_receive(&[0.0], Rank(1), &mut recv, Rank(1), Tag(333))
            .unwrap_err();
        assert!(matches!(err, CommError::Disconnected { peer: Rank(1) }));
    }
}
